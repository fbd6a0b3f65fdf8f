use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{NonGenericTypeInfoCell, ScalarInfo, ScalarKind, TypeInfo, Typed};
use crate::ops::{ReflectRef, Scalar};
use crate::value::Value;
use crate::{FromRepr, Reflect};

// -----------------------------------------------------------------------------
// Shared

macro_rules! impl_scalar_reflect {
    ($ty:ty => $kind:ident) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Self>(ScalarKind::$kind)))
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Scalar(self)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_int {
    ($($ty:ty => $kind:ident,)*) => {$(
        impl_scalar_reflect!($ty => $kind);

        impl Scalar for $ty {
            fn to_value(&self) -> Result<Value, Cow<'static, str>> {
                i64::try_from(*self)
                    .map(Value::Int)
                    .map_err(|_| format!("{self} does not fit in a 64-bit signed integer").into())
            }
        }

        impl FromRepr for $ty {
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                let declared = <Self as Typed>::type_info();
                match &*de.check(declared, value)? {
                    Value::Int(i) => <$ty>::try_from(*i)
                        .map_err(|_| de.reject(declared, value, "integer out of range")),
                    _ => Err(de.reject(declared, value, "expected an integer")),
                }
            }
        }
    )*};
}

impl_int! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_float {
    ($($ty:ty => $kind:ident,)*) => {$(
        impl_scalar_reflect!($ty => $kind);

        impl Scalar for $ty {
            #[inline]
            fn to_value(&self) -> Result<Value, Cow<'static, str>> {
                Ok(Value::Float(f64::from(*self)))
            }
        }

        impl FromRepr for $ty {
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                let declared = <Self as Typed>::type_info();
                match &*de.check(declared, value)? {
                    Value::Float(f) => Ok(*f as $ty),
                    _ => Err(de.reject(declared, value, "expected a float")),
                }
            }
        }
    )*};
}

impl_float! {
    f32 => F32,
    f64 => F64,
}

// -----------------------------------------------------------------------------
// Other primitives

impl_scalar_reflect!(() => Unit);
impl_scalar_reflect!(bool => Bool);
impl_scalar_reflect!(char => Char);
impl_scalar_reflect!(String => Str);
impl_scalar_reflect!(Value => Any);
impl_scalar_reflect!(ByteBuf => Bytes);

impl Scalar for () {
    #[inline]
    fn to_value(&self) -> Result<Value, Cow<'static, str>> {
        Ok(Value::Null)
    }
}

impl FromRepr for () {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        de.check(<Self as Typed>::type_info(), value).map(|_| ())
    }
}

impl Scalar for bool {
    #[inline]
    fn to_value(&self) -> Result<Value, Cow<'static, str>> {
        Ok(Value::Bool(*self))
    }
}

impl FromRepr for bool {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        let declared = <Self as Typed>::type_info();
        match &*de.check(declared, value)? {
            Value::Bool(b) => Ok(*b),
            _ => Err(de.reject(declared, value, "expected a bool")),
        }
    }
}

impl Scalar for char {
    #[inline]
    fn to_value(&self) -> Result<Value, Cow<'static, str>> {
        Ok(Value::Str(self.to_string()))
    }
}

impl FromRepr for char {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        let declared = <Self as Typed>::type_info();
        let checked = de.check(declared, value)?;
        let mut chars = checked.as_str().unwrap_or_default().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(de.reject(declared, value, "expected a single character")),
        }
    }
}

impl Scalar for String {
    #[inline]
    fn to_value(&self) -> Result<Value, Cow<'static, str>> {
        Ok(Value::Str(self.clone()))
    }
}

impl FromRepr for String {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        let declared = <Self as Typed>::type_info();
        match de.check(declared, value)? {
            Cow::Borrowed(Value::Str(s)) => Ok(s.clone()),
            Cow::Owned(Value::Str(s)) => Ok(s),
            _ => Err(de.reject(declared, value, "expected a string")),
        }
    }
}

impl Scalar for Value {
    #[inline]
    fn to_value(&self) -> Result<Value, Cow<'static, str>> {
        Ok(self.clone())
    }
}

impl FromRepr for Value {
    #[inline]
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        de.check(<Self as Typed>::type_info(), value)
            .map(Cow::into_owned)
    }
}

// -----------------------------------------------------------------------------
// ByteBuf

/// An owned byte string, represented as [`Value::Bytes`].
///
/// `Vec<u8>` is a list of integers; wrap it in `ByteBuf` to get a byte
/// string instead. Under [`Coerce`](crate::policy::Coerce) both forms are
/// accepted on input.
///
/// # Examples
///
/// ```
/// use conform_reflect::{ByteBuf, to_representation};
/// use conform_reflect::value::Value;
///
/// let buf = ByteBuf::from(vec![0xde, 0xad]);
/// assert_eq!(to_representation(&buf).unwrap(), Value::Bytes(vec![0xde, 0xad]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl ByteBuf {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteBuf {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteBuf {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Deref for ByteBuf {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ByteBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Scalar for ByteBuf {
    #[inline]
    fn to_value(&self) -> Result<Value, Cow<'static, str>> {
        Ok(Value::Bytes(self.0.clone()))
    }
}

impl FromRepr for ByteBuf {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        let declared = <Self as Typed>::type_info();
        match de.check(declared, value)? {
            Cow::Borrowed(Value::Bytes(bytes)) => Ok(Self(bytes.clone())),
            Cow::Owned(Value::Bytes(bytes)) => Ok(Self(bytes)),
            _ => Err(de.reject(declared, value, "expected bytes")),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::policy::{Coerce, Strict};
    use crate::value::Value;
    use crate::{ErrorKind, from_representation_with, to_representation_with};

    #[test]
    fn large_unsigned_is_unrepresentable() {
        let err = to_representation_with(&u64::MAX, &Coerce).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
        assert_eq!(
            to_representation_with(&(i64::MAX as u64), &Strict).unwrap(),
            Value::Int(i64::MAX)
        );
    }

    #[test]
    fn narrow_ints_are_range_checked() {
        let err = from_representation_with::<i8>(&Value::Int(-129), &Strict).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert_eq!(from_representation_with::<i8>(&Value::Int(-128), &Strict).unwrap(), -128);
    }

    #[test]
    fn char_and_unit() {
        assert_eq!(to_representation_with(&'x', &Strict).unwrap(), Value::from("x"));
        assert_eq!(from_representation_with::<char>(&Value::from("é"), &Strict).unwrap(), 'é');
        assert!(from_representation_with::<char>(&Value::from(""), &Coerce).is_err());
        assert_eq!(to_representation_with(&(), &Strict).unwrap(), Value::Null);
        assert!(from_representation_with::<()>(&Value::Int(0), &Coerce).is_err());
    }

    #[test]
    fn value_passes_through() {
        let input = Value::Seq(vec![Value::Null, Value::from("a")]);
        let out: Value = from_representation_with(&input, &Strict).unwrap();
        assert_eq!(out, input);
        assert_eq!(to_representation_with(&input, &Strict).unwrap(), input);
    }
}
