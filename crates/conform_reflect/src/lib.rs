#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `conform_reflect`
// in doc testing. But `macro_utils::Manifest` can only choose one, so we must
// have an `extern self` to ensure `conform_reflect` can be used as an alias
// for `crate`.
extern crate self as conform_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reflection;

pub mod de;
pub mod impls;
pub mod info;
pub mod ops;
pub mod path;
pub mod policy;
pub mod registry;
pub mod ser;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use conform_reflect_derive as derive;
pub use error::{Error, ErrorKind, Result};
pub use impls::ByteBuf;
pub use reflection::{FromRepr, Reflect};

use de::Deserializer;
use info::Typed;
use policy::{Coerce, CoercionPolicy};
use ser::Serializer;
use value::Value;

// -----------------------------------------------------------------------------
// Entry points

/// Converts `value` to its representation under [`Coerce`].
///
/// # Examples
///
/// ```
/// use conform_reflect::{derive::Reflect, to_representation};
/// use conform_reflect::value::Value;
///
/// #[derive(Reflect)]
/// struct Tls {
///     enabled: bool,
///     cert: Option<String>,
/// }
///
/// let value = to_representation(&Tls { enabled: true, cert: None }).unwrap();
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get("enabled"), Some(&Value::Bool(true)));
/// assert_eq!(map.get("cert"), Some(&Value::Null));
/// ```
#[inline]
pub fn to_representation<T: Reflect>(value: &T) -> Result<Value> {
    to_representation_with(value, &Coerce)
}

/// Converts `value` to its representation under `policy`.
#[inline]
pub fn to_representation_with<T: Reflect>(
    value: &T,
    policy: &dyn CoercionPolicy,
) -> Result<Value> {
    Serializer::new(policy).serialize(value)
}

/// Builds a `T` from its representation under [`Coerce`].
///
/// # Examples
///
/// ```
/// use conform_reflect::{derive::Reflect, from_representation};
/// use conform_reflect::value::{Mapping, Value};
///
/// #[derive(Reflect, Debug, PartialEq)]
/// struct Pool {
///     size: u32,
/// }
///
/// let mut map = Mapping::new();
/// map.insert("size", Value::from("16"));
///
/// let pool: Pool = from_representation(&Value::Map(map)).unwrap();
/// assert_eq!(pool, Pool { size: 16 });
/// ```
#[inline]
pub fn from_representation<T: Typed + FromRepr>(value: &Value) -> Result<T> {
    from_representation_with(value, &Coerce)
}

/// Builds a `T` from its representation under `policy`.
#[inline]
pub fn from_representation_with<T: Typed + FromRepr>(
    value: &Value,
    policy: &dyn CoercionPolicy,
) -> Result<T> {
    Deserializer::new(policy).deserialize(value)
}
