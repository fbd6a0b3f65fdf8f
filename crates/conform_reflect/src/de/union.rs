use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::de::Deserializer;
use crate::error::{ErrorKind, Result};
use crate::info::{Tagging, TypeInfo, UnionInfo};
use crate::policy::UnionResolution;
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Discriminator lookup

/// Where the variant of a union value comes from.
enum Resolved<'v> {
    /// A recognized discriminator named the variant.
    Tagged(usize, Cow<'v, Value>),
    /// No usable discriminator; try the variants against the payload.
    Fallback(Cow<'v, Value>),
}

fn without_key(map: &Mapping, key: &str) -> Value {
    Value::Map(
        map.iter()
            .filter(|(k, _)| *k != key)
            .map(|(k, v)| (k, v.clone()))
            .collect(),
    )
}

fn resolve<'v>(info: &UnionInfo, value: &'v Value) -> Resolved<'v> {
    match (info.tagging(), value) {
        (Tagging::Internal { tag }, Value::Map(map)) => match map.get(tag) {
            Some(Value::Str(name)) => {
                let payload = Cow::Owned(without_key(map, tag));
                match info.index_of_tag(name) {
                    Some(index) => Resolved::Tagged(index, payload),
                    None => Resolved::Fallback(payload),
                }
            }
            Some(_) => Resolved::Fallback(Cow::Owned(without_key(map, tag))),
            None => Resolved::Fallback(Cow::Borrowed(value)),
        },
        (Tagging::External, Value::Str(name)) => match info.index_of_tag(name) {
            Some(index) => Resolved::Tagged(index, Cow::Owned(Value::Null)),
            None => Resolved::Fallback(Cow::Borrowed(value)),
        },
        (Tagging::External, Value::Map(map)) if map.len() == 1 => {
            let tagged = map
                .iter()
                .next()
                .and_then(|(name, payload)| Some((info.index_of_tag(name)?, payload)));
            match tagged {
                Some((index, payload)) => Resolved::Tagged(index, Cow::Borrowed(payload)),
                None => Resolved::Fallback(Cow::Borrowed(value)),
            }
        }
        (Tagging::Adjacent { tag, content }, Value::Map(map)) => {
            let payload = match map.get(content) {
                Some(payload) => Cow::Borrowed(payload),
                None => Cow::Owned(Value::Null),
            };
            match map.get(tag) {
                Some(Value::Str(name)) => match info.index_of_tag(name) {
                    Some(index) => Resolved::Tagged(index, payload),
                    None => Resolved::Fallback(payload),
                },
                _ => Resolved::Fallback(Cow::Borrowed(value)),
            }
        }
        _ => Resolved::Fallback(Cow::Borrowed(value)),
    }
}

// -----------------------------------------------------------------------------
// Union entry points

impl<'p> Deserializer<'p> {
    /// Reads a union value.
    ///
    /// `build` constructs variant `index` from its payload. A recognized
    /// discriminator selects the variant directly. Without one, for input
    /// produced outside the tagging convention, every variant is tried in
    /// declaration order and the policy's [`UnionResolution`] decides:
    /// [`FirstMatch`](UnionResolution::FirstMatch) keeps the first success,
    /// [`ExactlyOne`](UnionResolution::ExactlyOne) fails with
    /// [`ErrorKind::AmbiguousUnion`] when several variants accept the value.
    pub fn union<T>(
        &mut self,
        declared: &'static TypeInfo,
        value: &Value,
        mut build: impl FnMut(&mut Self, usize, &Value) -> Result<T>,
    ) -> Result<T> {
        let Some(info) = declared.as_union() else {
            return Err(self.reject(declared, value, "not a union type"));
        };

        let payload = match resolve(info, value) {
            Resolved::Tagged(index, payload) => return build(self, index, &*payload),
            Resolved::Fallback(payload) => payload,
        };

        let resolution = self.policy.union_resolution();
        tracing::debug!(
            union = info.ty().path(),
            ?resolution,
            "no usable discriminator, trying variants in order"
        );

        let depth = self.depth;
        let path_len = self.path.len();
        let mut matched: Vec<(usize, T)> = Vec::new();

        for index in 0..info.variants().len() {
            match build(self, index, &*payload) {
                Ok(built) => {
                    if resolution == UnionResolution::FirstMatch {
                        return Ok(built);
                    }
                    matched.push((index, built));
                }
                Err(err) if err.kind().is_mismatch() => {
                    tracing::trace!(
                        union = info.ty().path(),
                        variant = info.variants()[index].name(),
                        %err,
                        "variant rejected"
                    );
                    self.restore(depth, path_len);
                }
                Err(err) => return Err(err),
            }
        }

        match matched.len() {
            0 => Err(self.reject(declared, value, "no variant matches")),
            1 => Ok(matched.swap_remove(0).1),
            _ => Err(self.error(ErrorKind::AmbiguousUnion {
                union: info.ty().path(),
                candidates: matched
                    .iter()
                    .map(|(index, _)| info.variants()[*index].name())
                    .collect(),
            })),
        }
    }

    /// Accepts the payload of a unit variant: null or an empty mapping.
    pub fn unit_variant(&self, declared: &TypeInfo, payload: &Value) -> Result<()> {
        match payload {
            Value::Null => Ok(()),
            Value::Map(map) if map.is_empty() => Ok(()),
            _ => Err(self.reject(declared, payload, "expected no payload")),
        }
    }
}
