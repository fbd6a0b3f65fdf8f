use alloc::boxed::Box;
use core::any::Any;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::TypeInfo;
use crate::ops::ReflectRef;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Reflect

/// The capability of being serialized by the [`Serializer`](crate::ser::Serializer).
///
/// Usually implemented through `#[derive(Reflect)]`. The trait is object
/// safe; the serializer only ever sees `&dyn Reflect`.
///
/// # Examples
///
/// ```
/// use conform_reflect::{Reflect, derive::Reflect, ops::ReflectRef};
///
/// #[derive(Reflect)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let p = Point { x: 1, y: 2 };
/// let dynamic: &dyn Reflect = &p;
/// assert!(matches!(dynamic.reflect_ref(), ReflectRef::Class(_)));
/// assert_eq!(dynamic.downcast_ref::<Point>().unwrap().y, 2);
/// ```
pub trait Reflect: Any {
    /// The descriptor of the runtime type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// A view of the value by shape.
    fn reflect_ref(&self) -> ReflectRef<'_>;
}

impl dyn Reflect {
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    /// Moves the value out if it is a `T`.
    #[inline]
    pub fn take<T: Any>(self: Box<Self>) -> Option<T> {
        let any: Box<dyn Any> = self;
        any.downcast::<T>().ok().map(|b| *b)
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect<{}>", self.reflect_type_info().type_path())
    }
}

// -----------------------------------------------------------------------------
// FromRepr

/// Construction from a [`Value`] under the rules of a [`Deserializer`].
///
/// Implementations report errors through the deserializer so they carry
/// the current field path, and build `Self` only after every part
/// succeeded.
pub trait FromRepr: Sized + 'static {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self>;
}
