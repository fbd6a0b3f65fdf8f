use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{Type, TypeInfo, Typed};
use crate::value::Value;
use crate::{FromRepr, Reflect};

/// Type-erased [`FromRepr::from_repr`].
pub type FromReprFn = fn(&Value, &mut Deserializer<'_>) -> Result<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// TypeMeta

/// What the registry knows about one type.
///
/// # Examples
///
/// ```
/// use conform_reflect::registry::TypeMeta;
///
/// let meta = TypeMeta::of::<Vec<u16>>();
/// assert_eq!(meta.ty().name(), "Vec<u16>");
/// ```
#[derive(Clone)]
pub struct TypeMeta {
    type_id: TypeId,
    type_info: &'static TypeInfo,
    from_repr: FromReprFn,
}

impl TypeMeta {
    pub fn of<T: Typed + Reflect + FromRepr>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_info: T::type_info(),
            from_repr: |value, de| {
                T::from_repr(value, de).map(|v| Box::new(v) as Box<dyn Reflect>)
            },
        }
    }

    /// The id of the registered Rust type.
    ///
    /// For transparent pointers such as `Box<T>` this differs from
    /// `self.ty().id()`, which describes `T`.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub const fn ty(&self) -> &'static Type {
        self.type_info.ty()
    }

    /// Builds an instance from `value`.
    #[inline]
    pub fn from_repr(&self, value: &Value, de: &mut Deserializer<'_>) -> Result<Box<dyn Reflect>> {
        (self.from_repr)(value, de)
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_path", &self.type_info.type_path())
            .finish_non_exhaustive()
    }
}
