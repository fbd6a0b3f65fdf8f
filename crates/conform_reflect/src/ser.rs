//! The serializer core: reflected instances to [`Value`] trees.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;
use core::ptr;

use conform_utils::hash::HashMap;

use crate::Reflect;
use crate::de::DEFAULT_MAX_DEPTH;
use crate::error::{Error, ErrorKind, Result};
use crate::info::{ClassInfo, FieldInfo, Skip, Tagging, TypeInfo, VariantKind};
use crate::ops::{Class, ReflectRef, Scalar, Union};
use crate::path::{FieldPath, Segment};
use crate::policy::{CoercionPolicy, Rejected};
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Reuse table

/// Data address and concrete type of a class instance.
///
/// A struct and its first field can share an address, so the type is
/// part of the identity.
type Identity = (usize, TypeId);

enum Visit {
    InProgress,
    Done(Value),
}

// -----------------------------------------------------------------------------
// Serializer

/// Converts reflected instances into [`Value`] trees.
///
/// # Identity reuse
///
/// With reuse enabled (the default), every class instance is recorded by
/// address before its fields are visited. Reaching the same instance again
/// after it finished emits a structural copy of the earlier output; the
/// representation has no aliasing, so shared instances are duplicated.
/// Reaching it again while it is still being visited means the object
/// graph is cyclic, which fails with [`ErrorKind::CyclicReference`].
///
/// Without reuse, nothing is recorded and a cycle runs into the depth
/// limit instead ([`ErrorKind::DepthExceeded`]).
///
/// The table lives for one [`serialize`](Self::serialize) call.
///
/// # Examples
///
/// ```
/// use conform_reflect::{derive::Reflect, ser::Serializer, policy::Strict};
/// use conform_reflect::value::Value;
///
/// #[derive(Reflect)]
/// struct Endpoint {
///     #[reflect(rename = "Host")]
///     host: String,
///     port: u16,
/// }
///
/// let endpoint = Endpoint { host: "localhost".into(), port: 8080 };
/// let value = Serializer::new(&Strict).serialize(&endpoint).unwrap();
///
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get("Host"), Some(&Value::from("localhost")));
/// assert_eq!(map.get("port"), Some(&Value::Int(8080)));
/// ```
pub struct Serializer<'p> {
    policy: &'p dyn CoercionPolicy,
    reuse: bool,
    max_depth: usize,
    depth: usize,
    path: FieldPath,
    seen: HashMap<Identity, Visit>,
}

impl<'p> Serializer<'p> {
    #[inline]
    pub fn new(policy: &'p dyn CoercionPolicy) -> Self {
        Self {
            policy,
            reuse: true,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            path: FieldPath::root(),
            seen: HashMap::default(),
        }
    }

    /// Enables or disables identity reuse. Enabled by default.
    #[inline]
    pub fn reuse(mut self, reuse: bool) -> Self {
        self.reuse = reuse;
        self
    }

    #[inline]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn policy(&self) -> &'p dyn CoercionPolicy {
        self.policy
    }

    /// Serializes a whole instance.
    pub fn serialize(&mut self, value: &dyn Reflect) -> Result<Value> {
        self.depth = 0;
        self.path = FieldPath::root();
        self.seen.clear();
        let result = self.any(value);
        self.seen.clear();
        result
    }

    // -------------------------------------------------------------------------
    // Helpers

    fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.path.clone())
    }

    fn reject(
        &self,
        declared: &TypeInfo,
        actual: String,
        reason: impl Into<Cow<'static, str>>,
    ) -> Error {
        self.error(ErrorKind::RejectedValue {
            declared: declared.type_path(),
            actual,
            reason: reason.into(),
        })
    }

    // Runs the policy on an emitted value.
    fn checked(&self, declared: &TypeInfo, value: Value) -> Result<Value> {
        let converted = match self.policy.check(declared, &value) {
            Ok(Cow::Borrowed(_)) => None,
            Ok(Cow::Owned(converted)) => Some(converted),
            Err(Rejected { reason }) => {
                return Err(self.reject(declared, value.to_string(), reason));
            }
        };
        Ok(converted.unwrap_or(value))
    }

    fn nested<T>(
        &mut self,
        segment: Segment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let result = self.deeper(f);
        self.path.pop();
        result
    }

    // One level deeper at the same path, for optional inners and newtype
    // payloads.
    fn deeper<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(self.error(ErrorKind::DepthExceeded {
                limit: self.max_depth,
            }));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // -------------------------------------------------------------------------
    // Shapes

    fn any(&mut self, value: &dyn Reflect) -> Result<Value> {
        let declared = value.reflect_type_info();
        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => self.scalar(declared, scalar),
            ReflectRef::Seq(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for (index, item) in seq.iter().enumerate() {
                    items.push(self.nested(Segment::Index(index), |ser| ser.any(item))?);
                }
                self.checked(declared, Value::Seq(items))
            }
            ReflectRef::Map(map) => {
                let mut entries = Mapping::with_capacity(map.len());
                for (key, item) in map.iter() {
                    let item = self.nested(Segment::Key(key.to_string()), |ser| ser.any(item))?;
                    entries.insert(key, item);
                }
                self.checked(declared, Value::Map(entries))
            }
            ReflectRef::Optional(None) => Ok(Value::Null),
            ReflectRef::Optional(Some(inner)) => self.deeper(|ser| ser.any(inner)),
            ReflectRef::Class(class) => self.class(class),
            ReflectRef::Union(union) => self.union(union),
        }
    }

    fn scalar(&self, declared: &TypeInfo, scalar: &dyn Scalar) -> Result<Value> {
        match scalar.to_value() {
            Ok(value) => self.checked(declared, value),
            Err(reason) => Err(self.reject(declared, String::from("<unrepresentable>"), reason)),
        }
    }

    fn class(&mut self, class: &dyn Class) -> Result<Value> {
        let declared = class.reflect_type_info();
        let Some(info) = declared.as_class() else {
            let actual = String::from("<class>");
            return Err(self.reject(declared, actual, "not described as a class"));
        };

        if !self.reuse {
            return self.class_fields(info, class);
        }

        let identity = (ptr::from_ref(class).cast::<()>().addr(), declared.ty().id());
        match self.seen.get(&identity) {
            Some(Visit::Done(value)) => {
                tracing::trace!(class = declared.type_path(), "reusing serialized instance");
                return Ok(value.clone());
            }
            Some(Visit::InProgress) => {
                return Err(self.error(ErrorKind::CyclicReference {
                    class: declared.type_path(),
                }));
            }
            None => {}
        }

        self.seen.insert(identity, Visit::InProgress);
        match self.class_fields(info, class) {
            Ok(value) => {
                self.seen.insert(identity, Visit::Done(value.clone()));
                Ok(value)
            }
            Err(err) => {
                self.seen.remove(&identity);
                Err(err)
            }
        }
    }

    fn class_fields(&mut self, info: &'static ClassInfo, class: &dyn Class) -> Result<Value> {
        if let Some(reason) = info.layout_error() {
            return Err(self.error(ErrorKind::InvalidClass {
                class: info.ty().path(),
                reason,
            }));
        }
        let slots = info.slots();
        let mut entries = Mapping::with_capacity(slots.len());
        for slot in slots {
            let Some(value) = follow(class, slot.route()) else {
                return Err(self.error(ErrorKind::Custom(
                    format!("`{}` has no field `{}`", info.ty().path(), slot.field().name()).into(),
                )));
            };
            self.emit_field(&mut entries, slot.field(), value)?;
        }
        Ok(Value::Map(entries))
    }

    fn emit_field(
        &mut self,
        entries: &mut Mapping,
        field: &FieldInfo,
        value: &dyn Reflect,
    ) -> Result<()> {
        match field.skip() {
            Skip::Always => return Ok(()),
            Skip::If(skip) if skip(value) => return Ok(()),
            _ => {}
        }
        let segment = Segment::Field(field.repr_name().to_string());
        let output = self.nested(segment, |ser| match field.serializer() {
            Some(hook) => hook(value).map_err(|e| e.or_at(&ser.path)),
            None => ser.any(value),
        })?;
        entries.insert(field.repr_name(), output);
        Ok(())
    }

    fn union(&mut self, union: &dyn Union) -> Result<Value> {
        let declared = union.reflect_type_info();
        let Some((info, variant)) = declared
            .as_union()
            .and_then(|info| Some((info, info.variant_at(union.variant_index())?)))
        else {
            return Err(self.reject(declared, String::from("<union>"), "unknown variant"));
        };

        let missing = |ser: &Self, index: usize| {
            ser.error(ErrorKind::Custom(
                format!("variant `{}` has no field {index}", variant.name()).into(),
            ))
        };

        let payload = match variant.kind() {
            VariantKind::Unit => None,
            VariantKind::Newtype(_) => {
                let inner = union.field_at(0).ok_or_else(|| missing(self, 0))?;
                Some(self.deeper(|ser| ser.any(inner))?)
            }
            VariantKind::Tuple(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for index in 0..elements.len() {
                    let item = union.field_at(index).ok_or_else(|| missing(self, index))?;
                    items.push(self.nested(Segment::Index(index), |ser| ser.any(item))?);
                }
                Some(Value::Seq(items))
            }
            VariantKind::Struct(fields) => {
                let mut entries = Mapping::with_capacity(fields.len());
                for field in fields {
                    let item = union
                        .field_at(field.index())
                        .ok_or_else(|| missing(self, field.index()))?;
                    self.emit_field(&mut entries, field, item)?;
                }
                Some(Value::Map(entries))
            }
        };

        let name = variant.tag();
        match info.tagging() {
            Tagging::Internal { tag } => match payload {
                None => Ok(Value::Map(Mapping::from_iter([(tag, Value::from(name))]))),
                Some(Value::Map(mut entries)) => {
                    if entries.contains_key(tag) {
                        return Err(self.reject(
                            declared,
                            Value::Map(entries).to_string(),
                            format!("payload already has a `{tag}` key"),
                        ));
                    }
                    entries.insert_first(tag, Value::from(name));
                    Ok(Value::Map(entries))
                }
                Some(other) => Err(self.reject(
                    declared,
                    other.to_string(),
                    "an internally tagged variant needs a mapping payload",
                )),
            },
            Tagging::External => Ok(match payload {
                None => Value::from(name),
                Some(payload) => Value::Map(Mapping::from_iter([(name, payload)])),
            }),
            Tagging::Adjacent { tag, content } => {
                let mut entries = Mapping::with_capacity(2);
                entries.insert(tag, Value::from(name));
                if let Some(payload) = payload {
                    entries.insert(content, payload);
                }
                Ok(Value::Map(entries))
            }
            Tagging::Untagged => Ok(payload.unwrap_or(Value::Null)),
        }
    }
}

/// Walks from a class through base fields to the field at `route`.
fn follow<'a>(class: &'a dyn Class, route: &[usize]) -> Option<&'a dyn Reflect> {
    let (&first, rest) = route.split_first()?;
    let mut current = class.field_at(first)?;
    for &index in rest {
        match current.reflect_ref() {
            ReflectRef::Class(base) => current = base.field_at(index)?,
            _ => return None,
        }
    }
    Some(current)
}

impl core::fmt::Debug for Serializer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Serializer")
            .field("policy", &self.policy)
            .field("reuse", &self.reuse)
            .field("max_depth", &self.max_depth)
            .field("path", &self.path)
            .finish()
    }
}
