use core::fmt;

use crate::info::{ArrayInfo, ClassInfo, ListInfo, MapInfo, OptionalInfo, SetInfo};
use crate::info::{TupleInfo, Type, UnionInfo};

// -----------------------------------------------------------------------------
// ScalarKind

/// The primitive shapes a scalar can take.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Unit,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Str,
    Bytes,
    /// Accepts any [`Value`](crate::value::Value) unchanged.
    Any,
}

impl ScalarKind {
    /// Inclusive bounds of integer kinds, `None` for every other kind.
    pub const fn int_range(self) -> Option<(i128, i128)> {
        Some(match self {
            ScalarKind::I8 => (i8::MIN as i128, i8::MAX as i128),
            ScalarKind::I16 => (i16::MIN as i128, i16::MAX as i128),
            ScalarKind::I32 => (i32::MIN as i128, i32::MAX as i128),
            ScalarKind::I64 => (i64::MIN as i128, i64::MAX as i128),
            ScalarKind::Isize => (isize::MIN as i128, isize::MAX as i128),
            ScalarKind::U8 => (0, u8::MAX as i128),
            ScalarKind::U16 => (0, u16::MAX as i128),
            ScalarKind::U32 => (0, u32::MAX as i128),
            ScalarKind::U64 => (0, u64::MAX as i128),
            ScalarKind::Usize => (0, usize::MAX as i128),
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }
}

// -----------------------------------------------------------------------------
// ScalarInfo

/// Descriptor of a scalar type.
#[derive(Debug)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
}

impl ScalarInfo {
    #[inline]
    pub fn new<T: ?Sized + 'static>(kind: ScalarKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// The declared shape of a reflected type.
///
/// Nested types are referenced through `fn() -> &'static TypeInfo`
/// pointers, so building a descriptor never forces the descriptors of its
/// children. Self-referential types are described without recursion.
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    List(ListInfo),
    Set(SetInfo),
    Array(ArrayInfo),
    Tuple(TupleInfo),
    Map(MapInfo),
    Optional(OptionalInfo),
    Class(ClassInfo),
    Union(UnionInfo),
}

macro_rules! impl_as_fn {
    ($($name:ident: $variant:ident => $info:ty,)*) => {$(
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                TypeInfo::$variant(info) => Some(info),
                _ => None,
            }
        }
    )*};
}

impl TypeInfo {
    pub const fn ty(&self) -> &Type {
        match self {
            TypeInfo::Scalar(info) => info.ty(),
            TypeInfo::List(info) => info.ty(),
            TypeInfo::Set(info) => info.ty(),
            TypeInfo::Array(info) => info.ty(),
            TypeInfo::Tuple(info) => info.ty(),
            TypeInfo::Map(info) => info.ty(),
            TypeInfo::Optional(info) => info.ty(),
            TypeInfo::Class(info) => info.ty(),
            TypeInfo::Union(info) => info.ty(),
        }
    }

    /// Shorthand for `self.ty().path()`.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// A lowercase name of the shape, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeInfo::Scalar(_) => "scalar",
            TypeInfo::List(_) => "list",
            TypeInfo::Set(_) => "set",
            TypeInfo::Array(_) => "array",
            TypeInfo::Tuple(_) => "tuple",
            TypeInfo::Map(_) => "map",
            TypeInfo::Optional(_) => "optional",
            TypeInfo::Class(_) => "class",
            TypeInfo::Union(_) => "union",
        }
    }

    impl_as_fn! {
        as_scalar: Scalar => ScalarInfo,
        as_list: List => ListInfo,
        as_set: Set => SetInfo,
        as_array: Array => ArrayInfo,
        as_tuple: Tuple => TupleInfo,
        as_map: Map => MapInfo,
        as_optional: Optional => OptionalInfo,
        as_class: Class => ClassInfo,
        as_union: Union => UnionInfo,
    }

    #[inline]
    pub const fn is_optional(&self) -> bool {
        matches!(self, TypeInfo::Optional(_))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ty().name())
    }
}
