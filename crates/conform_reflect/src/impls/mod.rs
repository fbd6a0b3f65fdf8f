//! Reflection for standard types.
//!
//! ## Implemented Menu
//!
//! - scalars:
//!     - `()`, `bool`, `char`, `String`
//!     - `i8`-`i64`, `isize`, `u8`-`u64`, `usize`, `f32`, `f64`
//!     - [`ByteBuf`](crate::ByteBuf), [`Value`](crate::value::Value) (accepts anything)
//! - sequences: `Vec<T>`, `VecDeque<T>`, `[T; N]`, tuples of up to 6 elements
//! - sets: `BTreeSet<T>`, `HashSet<T, S>`
//! - maps: `BTreeMap<K, V>`, `HashMap<K, V, S>` with a [`MapKey`] key
//! - optionals: `Option<T>`, `OnceCell<T>`
//! - transparent: `Box<T>`, `Rc<T>`, `Arc<T>`
//!
//! `u64` and `usize` values above `i64::MAX` have no representation and
//! fail to serialize.

// -----------------------------------------------------------------------------
// Modules

mod map;
mod option;
mod pointer;
mod scalar;
mod seq;
mod tuple;

// -----------------------------------------------------------------------------
// Exports

pub use map::MapKey;
pub use scalar::ByteBuf;
