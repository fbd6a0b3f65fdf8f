use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use conform_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Storage of the [`TypeInfo`] of a non-generic type.
///
/// Declared as a `static` inside `Typed::type_info`:
///
/// ```
/// use conform_reflect::info::{NonGenericTypeInfoCell, ScalarInfo, ScalarKind, TypeInfo, Typed};
///
/// struct Celsius;
///
/// impl Typed for Celsius {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Self>(ScalarKind::F64)))
///     }
/// }
///
/// assert!(core::ptr::eq(Celsius::type_info(), Celsius::type_info()));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the cached info, building it with `f` on first call.
    ///
    /// Racing first calls block until one of them finished.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Storage of the [`TypeInfo`] of every instantiation of a generic type.
///
/// A `static` in a generic function is shared by all instantiations, so
/// entries are keyed by the `TypeId` of the fully-parameterized type.
/// `Page<u32>` and `Page<String>` get distinct descriptors.
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info of `T`, building it with `f` on first call.
    ///
    /// `f` runs without holding the lock. When two threads race, both build
    /// a descriptor, the first insertion wins and the other is dropped, so
    /// every caller observes the same `&'static` instance.
    pub fn get_or_insert<T: Any + ?Sized>(
        &self,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        let type_id = TypeId::of::<T>();

        if let Some(info) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return *info;
        }

        let info = f();

        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *map.get_or_insert(type_id, || &*Box::leak(Box::new(info)))
    }
}
