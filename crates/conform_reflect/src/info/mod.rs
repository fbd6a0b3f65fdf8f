//! Cached descriptors of reflected types.
//!
//! Every reflected type has exactly one [`TypeInfo`], built on first use
//! and kept for the lifetime of the process. Fetching it twice yields the
//! same `&'static` reference.
//!
//! ```
//! use conform_reflect::{derive::Reflect, info::Typed};
//!
//! #[derive(Reflect)]
//! struct Server {
//!     host: String,
//!     #[reflect(rename = "Port")]
//!     port: u16,
//! }
//!
//! let info = Server::type_info().as_class().unwrap();
//! assert!(core::ptr::eq(Server::type_info(), Server::type_info()));
//!
//! let names: Vec<_> = info.slots().iter().map(|s| s.field().repr_name()).collect();
//! assert_eq!(names, ["host", "Port"]);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod class_info;
mod container_info;
mod field_info;
mod ty;
mod type_info;
mod typed;
mod union_info;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use class_info::{BaseInfo, ClassInfo, Slot};
pub use container_info::{ArrayInfo, ListInfo, MapInfo, OptionalInfo, SetInfo, TupleInfo};
pub use field_info::{DeserializeHook, FieldInfo, SerializeHook, Skip};
pub use ty::Type;
pub use type_info::{ScalarInfo, ScalarKind, TypeInfo};
pub use typed::{Typed, describe};
pub use union_info::{Tagging, UnionInfo, VariantInfo, VariantKind};
