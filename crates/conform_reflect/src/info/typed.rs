use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// Static access to the cached descriptor of a type.
///
/// Implemented by `#[derive(Reflect)]` and for the supported standard
/// types. Smart pointers (`Box`, `Rc`, `Arc`) are transparent and return
/// the descriptor of their pointee.
pub trait Typed: 'static {
    fn type_info() -> &'static TypeInfo;
}

/// Returns the descriptor of `T`.
///
/// ```
/// use conform_reflect::info::{describe, ScalarKind};
///
/// let info = describe::<Option<u16>>().as_optional().unwrap();
/// assert_eq!(info.item_info().as_scalar().unwrap().kind(), ScalarKind::U16);
/// ```
#[inline]
pub fn describe<T: Typed>() -> &'static TypeInfo {
    T::type_info()
}
