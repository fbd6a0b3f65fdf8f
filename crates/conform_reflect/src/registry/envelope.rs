//! Representations that name their type: `{"full::type::Path": value}`.

use alloc::boxed::Box;
use alloc::string::ToString;

use crate::Reflect;
use crate::de::Deserializer;
use crate::error::{ErrorKind, Result};
use crate::path::Segment;
use crate::registry::TypeRegistry;
use crate::ser::Serializer;
use crate::value::{Mapping, Value};

/// Serializes `value` wrapped in a single-entry mapping keyed by its
/// full type path.
///
/// # Examples
///
/// ```
/// use conform_reflect::{derive::Reflect, policy::Coerce, ser::Serializer};
/// use conform_reflect::de::Deserializer;
/// use conform_reflect::registry::{TypeRegistry, to_envelope};
///
/// #[derive(Reflect, Debug, PartialEq)]
/// struct Retry {
///     attempts: u8,
/// }
///
/// let envelope = to_envelope(&Retry { attempts: 3 }, &mut Serializer::new(&Coerce)).unwrap();
/// let key = envelope.as_map().unwrap().keys().next().unwrap();
/// assert!(key.ends_with("::Retry"));
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Retry>();
///
/// let back = registry
///     .from_envelope(&envelope, &mut Deserializer::new(&Coerce))
///     .unwrap();
/// assert_eq!(back.take::<Retry>(), Some(Retry { attempts: 3 }));
/// ```
pub fn to_envelope(value: &dyn Reflect, ser: &mut Serializer<'_>) -> Result<Value> {
    let inner = ser.serialize(value)?;
    let mut map = Mapping::with_capacity(1);
    map.insert(value.reflect_type_info().type_path(), inner);
    Ok(Value::Map(map))
}

impl TypeRegistry {
    /// Reads a value written by [`to_envelope`].
    ///
    /// The key is resolved by full path, then by short name; an unknown key
    /// is [`ErrorKind::UnresolvedType`].
    pub fn from_envelope(
        &self,
        envelope: &Value,
        de: &mut Deserializer<'_>,
    ) -> Result<Box<dyn Reflect>> {
        de.reset();
        let (name, inner) = match envelope.as_map() {
            Some(map) if map.len() == 1 => match map.iter().next() {
                Some(entry) => entry,
                None => return Err(envelope_error(de, envelope)),
            },
            _ => return Err(envelope_error(de, envelope)),
        };
        let meta = self.resolve(name).map_err(|e| e.or_at(de.path()))?;
        de.nested(Segment::Key(name.to_string()), |de| meta.from_repr(inner, de))
    }
}

fn envelope_error(de: &Deserializer<'_>, envelope: &Value) -> crate::Error {
    de.error(ErrorKind::RejectedValue {
        declared: "type envelope",
        actual: envelope.to_string(),
        reason: "expected a mapping with exactly one entry".into(),
    })
}

#[cfg(test)]
mod tests {
    use crate::de::Deserializer;
    use crate::policy::Strict;
    use crate::registry::TypeRegistry;
    use crate::value::{Mapping, Value};
    use crate::ErrorKind;

    #[test]
    fn short_names_resolve_too() {
        let mut map = Mapping::new();
        map.insert("u16", Value::Int(9));
        let registry = TypeRegistry::new();
        let back = registry
            .from_envelope(&Value::Map(map), &mut Deserializer::new(&Strict))
            .unwrap();
        assert_eq!(back.take::<u16>(), Some(9));
    }

    #[test]
    fn unknown_type_is_unresolved() {
        let mut map = Mapping::new();
        map.insert("demo::Gone", Value::Null);
        let err = TypeRegistry::new()
            .from_envelope(&Value::Map(map), &mut Deserializer::new(&Strict))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnresolvedType { .. }));
    }

    #[test]
    fn envelope_needs_one_entry() {
        let err = TypeRegistry::new()
            .from_envelope(&Value::Map(Mapping::new()), &mut Deserializer::new(&Strict))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
    }
}
