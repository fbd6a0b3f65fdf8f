use alloc::boxed::Box;
use alloc::vec;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{GenericTypeInfoCell, TupleInfo, TypeInfo, Typed};
use crate::ops::{ReflectRef, Sequence};
use crate::path::Segment;
use crate::value::Value;
use crate::{FromRepr, Reflect};

// Tuples are fixed-length sequences.
macro_rules! impl_tuple {
    ($len:literal: $($name:ident $index:tt),+) => {
        impl<$($name: Typed),+> Typed for ($($name,)+) {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let elements = vec![$($name::type_info as fn() -> &'static TypeInfo),+];
                    TypeInfo::Tuple(TupleInfo::new::<Self>(elements))
                })
            }
        }

        impl<$($name: Typed + Reflect),+> Reflect for ($($name,)+) {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Seq(self)
            }
        }

        impl<$($name: Reflect),+> Sequence for ($($name,)+) {
            #[inline]
            fn len(&self) -> usize {
                $len
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new([$(&self.$index as &dyn Reflect),+].into_iter())
            }
        }

        impl<$($name: Typed + FromRepr),+> FromRepr for ($($name,)+) {
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                let items = de.tuple(<Self as Typed>::type_info(), value, $len)?;
                Ok(($(de.element::<$name>(Segment::Index($index), &items[$index])?,)+))
            }
        }
    };
}

impl_tuple!(1: P0 0);
impl_tuple!(2: P0 0, P1 1);
impl_tuple!(3: P0 0, P1 1, P2 2);
impl_tuple!(4: P0 0, P1 1, P2 2, P3 3);
impl_tuple!(5: P0 0, P1 1, P2 2, P3 3, P4 4);
impl_tuple!(6: P0 0, P1 1, P2 2, P3 3, P4 4, P5 5);
