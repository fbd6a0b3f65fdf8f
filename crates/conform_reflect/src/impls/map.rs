use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use crate::de::Deserializer;
use crate::error::Result;
use crate::info::{GenericTypeInfoCell, MapInfo, TypeInfo, Typed};
use crate::ops::{Map, ReflectRef};
use crate::path::Segment;
use crate::value::Value;
use crate::{FromRepr, Reflect};

// -----------------------------------------------------------------------------
// MapKey

/// A map key with a string form.
///
/// Representation mappings are string-keyed; map types are reflected only
/// for keys that convert both ways.
pub trait MapKey: Sized {
    fn to_key(&self) -> Cow<'_, str>;

    /// Parses a key back, `None` if `key` is not a valid `Self`.
    fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
    #[inline]
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }

    #[inline]
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }
}

impl MapKey for char {
    #[inline]
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

macro_rules! impl_parsed_key {
    ($($ty:ty),*) => {$(
        impl MapKey for $ty {
            #[inline]
            fn to_key(&self) -> Cow<'_, str> {
                Cow::Owned(self.to_string())
            }

            #[inline]
            fn from_key(key: &str) -> Option<Self> {
                key.parse().ok()
            }
        }
    )*};
}

impl_parsed_key!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Maps

// Reads every entry of a checked mapping.
fn collect<K, V, C>(declared: &TypeInfo, value: &Value, de: &mut Deserializer<'_>) -> Result<C>
where
    K: MapKey + Typed,
    V: FromRepr,
    C: FromIterator<(K, V)>,
{
    let entries = de.map(declared, value)?;
    entries
        .iter()
        .map(|(key, item)| {
            de.nested(Segment::Key(key.to_string()), |de| {
                let Some(key) = K::from_key(key) else {
                    return Err(de.reject(K::type_info(), &Value::from(key), "invalid map key"));
                };
                Ok((key, V::from_repr(item, de)?))
            })
        })
        .collect()
}

macro_rules! impl_map {
    ($ty:ident < K, V $(, $hasher:ident)? > where $($bound:tt)+) => {
        impl<K: Typed, V: Typed $(, $hasher: 'static)?> Typed for $ty<K, V $(, $hasher)?> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<K, V $(, $hasher)?> Reflect for $ty<K, V $(, $hasher)?>
        where
            K: MapKey + Typed,
            V: Typed + Reflect,
            $($hasher: 'static,)?
        {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }
        }

        impl<K: MapKey, V: Reflect $(, $hasher)?> Map for $ty<K, V $(, $hasher)?> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V $(, $hasher)?>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (Cow<'_, str>, &dyn Reflect)> + '_> {
                Box::new(
                    IntoIterator::into_iter(self)
                        .map(|(key, item)| (key.to_key(), item as &dyn Reflect)),
                )
            }
        }

        impl<K, V $(, $hasher)?> FromRepr for $ty<K, V $(, $hasher)?>
        where
            K: MapKey + Typed,
            V: Typed + FromRepr,
            $($bound)+
        {
            fn from_repr(value: &Value, de: &mut Deserializer<'_>) -> Result<Self> {
                collect::<K, V, Self>(<Self as Typed>::type_info(), value, de)
            }
        }
    };
}

impl_map!(BTreeMap<K, V> where K: Ord);
impl_map!(HashMap<K, V, S> where K: Eq + Hash, S: BuildHasher + Default + 'static);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use crate::path::Segment;
    use crate::policy::Strict;
    use crate::value::{Mapping, Value};
    use crate::{from_representation_with, to_representation_with};

    #[test]
    fn integer_keys_render_as_strings() {
        let map = BTreeMap::from([(10_u16, "ten".to_string()), (2, "two".to_string())]);
        let value = to_representation_with(&map, &Strict).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["2", "10"]);

        let back: BTreeMap<u16, String> = from_representation_with(&value, &Strict).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn bad_key_is_reported_at_the_key() {
        let mut mapping = Mapping::new();
        mapping.insert("port", Value::Int(1));
        let err = from_representation_with::<BTreeMap<u16, i32>>(&Value::Map(mapping), &Strict)
            .unwrap_err();
        assert_eq!(err.path().segments(), [Segment::Key("port".into())]);
    }
}
