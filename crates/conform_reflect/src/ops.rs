//! Per-shape access to reflected values.
//!
//! [`Reflect::reflect_ref`] returns a [`ReflectRef`], the closed set of
//! shapes the serializer dispatches on.

use alloc::borrow::Cow;
use alloc::boxed::Box;

use crate::Reflect;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ReflectRef

/// A borrowed view of a value, by shape.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Scalar),
    /// Lists, sets, arrays, tuples and tuple structs.
    Seq(&'a dyn Sequence),
    Map(&'a dyn Map),
    Optional(Option<&'a dyn Reflect>),
    Class(&'a dyn Class),
    Union(&'a dyn Union),
}

impl ReflectRef<'_> {
    /// A lowercase name of the shape.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ReflectRef::Scalar(_) => "scalar",
            ReflectRef::Seq(_) => "sequence",
            ReflectRef::Map(_) => "map",
            ReflectRef::Optional(_) => "optional",
            ReflectRef::Class(_) => "class",
            ReflectRef::Union(_) => "union",
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// A leaf value.
pub trait Scalar {
    /// Converts to a [`Value`], or explains why the value has no representation.
    fn to_value(&self) -> Result<Value, Cow<'static, str>>;
}

// -----------------------------------------------------------------------------
// Sequence

pub trait Sequence {
    fn len(&self) -> usize;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

// -----------------------------------------------------------------------------
// Map

/// A map whose keys render as strings.
pub trait Map {
    fn len(&self) -> usize;

    fn iter(&self) -> Box<dyn Iterator<Item = (Cow<'_, str>, &dyn Reflect)> + '_>;
}

// -----------------------------------------------------------------------------
// Class

/// A struct with named fields.
pub trait Class: Reflect {
    /// The field at Rust position `index`, base fields included.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;
}

// -----------------------------------------------------------------------------
// Union

/// An enum.
pub trait Union: Reflect {
    /// Position of the active variant in the declaration.
    fn variant_index(&self) -> usize;

    /// Field `index` of the active variant.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;
}
