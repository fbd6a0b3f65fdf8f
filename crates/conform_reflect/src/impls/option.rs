use core::cell::OnceCell;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{GenericTypeInfoCell, OptionalInfo, TypeInfo, Typed};
use crate::ops::ReflectRef;
use crate::value::Value;
use crate::{FromRepr, Reflect};

// `None` is `Null`; any other value is read as the inner type.
macro_rules! impl_optional {
    ($ty:ident, $get:expr, $empty:expr, $full:expr) => {
        impl<T: Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<Self, T>()))
            }
        }

        impl<T: Typed + Reflect> Reflect for $ty<T> {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let get: fn(&Self) -> Option<&T> = $get;
                ReflectRef::Optional(get(self).map(|inner| inner as &dyn Reflect))
            }
        }

        impl<T: Typed + FromRepr> FromRepr for $ty<T> {
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                if value.is_null() {
                    return Ok($empty);
                }
                de.deeper(|de| T::from_repr(value, de)).map($full)
            }
        }
    };
}

impl_optional!(Option, Option::as_ref, None, Some);
impl_optional!(OnceCell, OnceCell::get, OnceCell::new(), OnceCell::from);

#[cfg(test)]
mod tests {
    use core::cell::OnceCell;

    use crate::policy::Strict;
    use crate::value::Value;
    use crate::{from_representation_with, to_representation_with};

    #[test]
    fn null_is_none() {
        assert_eq!(to_representation_with(&None::<u8>, &Strict).unwrap(), Value::Null);
        assert_eq!(to_representation_with(&Some(3_u8), &Strict).unwrap(), Value::Int(3));
        let none: Option<u8> = from_representation_with(&Value::Null, &Strict).unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn once_cell_is_optional() {
        let cell = OnceCell::from(String::from("set"));
        assert_eq!(to_representation_with(&cell, &Strict).unwrap(), Value::from("set"));
        let empty: OnceCell<String> = from_representation_with(&Value::Null, &Strict).unwrap();
        assert!(empty.get().is_none());
    }
}
