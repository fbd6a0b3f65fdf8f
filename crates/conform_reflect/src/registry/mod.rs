//! Lookup of reflected types by `TypeId`, full path or short name.
//!
//! ## Menu
//!
//! - [`TypeMeta`]: a descriptor plus a type-erased constructor.
//! - [`TypeRegistry`]: a container for storing and querying `TypeMeta`s.
//! - [`TypeRegistryArc`]: a shareable, lockable registry; [`global`] is the
//!   process-wide one.
//! - [`to_envelope`] / [`TypeRegistry::from_envelope`]: representations that
//!   carry their type path, `{"my_crate::Config": {...}}`.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use the [`inventory`] crate to implement static registration; not all
//! platforms support it (although major platforms do). Where it is not
//! supported, `auto_register` returns `false` without causing any errors.

// -----------------------------------------------------------------------------
// Modules

mod envelope;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use envelope::to_envelope;
pub use type_meta::{FromReprFn, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc, global};
