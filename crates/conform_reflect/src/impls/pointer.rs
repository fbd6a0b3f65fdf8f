use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{TypeInfo, Typed};
use crate::ops::ReflectRef;
use crate::value::Value;
use crate::{FromRepr, Reflect};

// Pointers are invisible in the representation: descriptor, view and
// construction all come from the pointee.
macro_rules! impl_transparent {
    ($($ty:ident),*) => {$(
        impl<T: Typed> Typed for $ty<T> {
            #[inline]
            fn type_info() -> &'static TypeInfo {
                T::type_info()
            }
        }

        impl<T: Reflect> Reflect for $ty<T> {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                T::reflect_type_info(self)
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                T::reflect_ref(self)
            }
        }

        impl<T: FromRepr> FromRepr for $ty<T> {
            #[inline]
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                T::from_repr(value, de).map($ty::new)
            }
        }
    )*};
}

impl_transparent!(Box, Rc, Arc);

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use crate::info::Typed;
    use crate::policy::Strict;
    use crate::value::Value;
    use crate::{from_representation_with, to_representation_with};

    #[test]
    fn pointers_are_transparent() {
        assert!(core::ptr::eq(<Box<u8>>::type_info(), u8::type_info()));
        assert_eq!(to_representation_with(&Rc::new(7_i32), &Strict).unwrap(), Value::Int(7));
        let back: Box<i32> = from_representation_with(&Value::Int(7), &Strict).unwrap();
        assert_eq!(*back, 7);
    }
}
