use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{Type, TypeInfo, Typed};

type InfoFn = fn() -> &'static TypeInfo;

// The pointer is printed, not followed: following it could recurse.
struct Lazy<'a>(&'a InfoFn);

impl fmt::Debug for Lazy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", *self.0 as *const ())
    }
}

macro_rules! impl_item_container {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            ty: Type,
            item: InfoFn,
        }

        impl $name {
            #[inline]
            pub fn new<TSelf: ?Sized + 'static, TItem: Typed>() -> Self {
                Self {
                    ty: Type::of::<TSelf>(),
                    item: TItem::type_info,
                }
            }

            #[inline]
            pub const fn ty(&self) -> &Type {
                &self.ty
            }

            /// The element descriptor.
            #[inline]
            pub fn item_info(&self) -> &'static TypeInfo {
                (self.item)()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("ty", &self.ty)
                    .field("item", &Lazy(&self.item))
                    .finish()
            }
        }
    };
}

impl_item_container! {
    /// Descriptor of an ordered, growable sequence such as `Vec<T>`.
    ListInfo
}

impl_item_container! {
    /// Descriptor of a set. Sets are represented as sequences.
    SetInfo
}

impl_item_container! {
    /// Descriptor of an optional value. `None` is represented as `Null`.
    OptionalInfo
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Descriptor of a fixed-length array `[T; N]`.
pub struct ArrayInfo {
    ty: Type,
    item: InfoFn,
    len: usize,
}

impl ArrayInfo {
    #[inline]
    pub fn new<TSelf: 'static, TItem: Typed>(len: usize) -> Self {
        Self {
            ty: Type::of::<TSelf>(),
            item: TItem::type_info,
            len,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }
}

impl fmt::Debug for ArrayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayInfo")
            .field("ty", &self.ty)
            .field("len", &self.len)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TupleInfo

/// Descriptor of a tuple or a tuple struct with more than one field.
pub struct TupleInfo {
    ty: Type,
    elements: Box<[InfoFn]>,
}

impl TupleInfo {
    pub fn new<TSelf: 'static>(elements: Vec<InfoFn>) -> Self {
        Self {
            ty: Type::of::<TSelf>(),
            elements: elements.into_boxed_slice(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn element_info(&self, index: usize) -> Option<&'static TypeInfo> {
        self.elements.get(index).map(|f| f())
    }
}

impl fmt::Debug for TupleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleInfo")
            .field("ty", &self.ty)
            .field("len", &self.elements.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Descriptor of a map. Keys are always represented as strings.
pub struct MapInfo {
    ty: Type,
    key: InfoFn,
    value: InfoFn,
}

impl MapInfo {
    #[inline]
    pub fn new<TSelf: 'static, TKey: Typed, TValue: Typed>() -> Self {
        Self {
            ty: Type::of::<TSelf>(),
            key: TKey::type_info,
            value: TValue::type_info,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }
}

impl fmt::Debug for MapInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapInfo")
            .field("ty", &self.ty)
            .field("value", &Lazy(&self.value))
            .finish()
    }
}
