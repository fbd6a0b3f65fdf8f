use alloc::boxed::Box;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::HashSet;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{ArrayInfo, GenericTypeInfoCell, ListInfo, SetInfo, TypeInfo, Typed};
use crate::ops::{ReflectRef, Sequence};
use crate::path::Segment;
use crate::value::Value;
use crate::{FromRepr, Reflect};

// Reads every item of a checked sequence into `C`.
fn collect<T: FromRepr, C: FromIterator<T>>(
    declared: &TypeInfo,
    value: &Value,
    de: &mut Deserializer<'_>,
) -> Result<C> {
    let items = de.seq(declared, value)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| de.element::<T>(Segment::Index(index), item))
        .collect()
}

// -----------------------------------------------------------------------------
// Lists and sets

macro_rules! impl_seq {
    ($variant:ident, $info:ident, $ty:ident < T $(, $hasher:ident)? > $(where $($bound:tt)+)?) => {
        impl<T: Typed $(, $hasher: 'static)?> Typed for $ty<T $(, $hasher)?> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::$variant(<$info>::new::<Self, T>())
                })
            }
        }

        impl<T: Typed + Reflect $(, $hasher: 'static)?> Reflect for $ty<T $(, $hasher)?> {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Seq(self)
            }
        }

        impl<T: Reflect $(, $hasher)?> Sequence for $ty<T $(, $hasher)?> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T $(, $hasher)?>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(IntoIterator::into_iter(self).map(|item| item as &dyn Reflect))
            }
        }

        impl<T: Typed + FromRepr $(, $hasher: 'static)?> FromRepr for $ty<T $(, $hasher)?>
        $(where $($bound)+)?
        {
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                collect::<T, Self>(<Self as Typed>::type_info(), value, de)
            }
        }
    };
}

impl_seq!(List, ListInfo, Vec<T>);
impl_seq!(List, ListInfo, VecDeque<T>);
impl_seq!(Set, SetInfo, BTreeSet<T> where T: Ord);
impl_seq!(Set, SetInfo, HashSet<T, S> where T: Eq + Hash, S: BuildHasher + Default);

// -----------------------------------------------------------------------------
// Arrays

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(N)))
    }
}

impl<T: Typed + Reflect, const N: usize> Reflect for [T; N] {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Seq(self)
    }
}

impl<T: Reflect, const N: usize> Sequence for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.as_slice().iter().map(|item| item as &dyn Reflect))
    }
}

impl<T: Typed + FromRepr, const N: usize> FromRepr for [T; N] {
    fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
        let declared = <Self as Typed>::type_info();
        let items: Vec<T> = collect(declared, value, de)?;
        <[T; N]>::try_from(items).map_err(|items| {
            let reason = alloc::format!("expected {N} elements, found {}", items.len());
            de.reject(declared, value, reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::{BTreeSet, VecDeque};

    use crate::path::Segment;
    use crate::policy::{Coerce, Strict};
    use crate::value::Value;
    use crate::{from_representation_with, to_representation_with};

    fn ints(items: &[i64]) -> Value {
        Value::Seq(items.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn lists_keep_order() {
        let list = VecDeque::from([3_u8, 1, 2]);
        assert_eq!(to_representation_with(&list, &Strict).unwrap(), ints(&[3, 1, 2]));
        let back: VecDeque<u8> = from_representation_with(&ints(&[3, 1, 2]), &Strict).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn sets_emit_sequences() {
        let set = BTreeSet::from([2_i32, 1]);
        assert_eq!(to_representation_with(&set, &Strict).unwrap(), ints(&[1, 2]));
        let back: BTreeSet<i32> = from_representation_with(&ints(&[2, 2, 1]), &Strict).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn element_errors_carry_the_index() {
        let input = Value::Seq(vec![Value::Int(1), Value::from("x")]);
        let err = from_representation_with::<Vec<i32>>(&input, &Coerce).unwrap_err();
        assert_eq!(err.path().segments(), [Segment::Index(1)]);
    }

    #[test]
    fn arrays_need_the_exact_length() {
        assert!(from_representation_with::<[u8; 3]>(&ints(&[1, 2]), &Coerce).is_err());
        let arr: [u8; 2] = from_representation_with(&Value::Bytes(vec![4, 5]), &Coerce).unwrap();
        assert_eq!(arr, [4, 5]);
    }
}
