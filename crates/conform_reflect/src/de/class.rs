use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::ptr;

use crate::FromRepr;
use crate::de::Deserializer;
use crate::error::{ErrorKind, Result};
use crate::info::{ClassInfo, FieldInfo, Skip, TypeInfo, UnionInfo, VariantInfo};
use crate::path::Segment;
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Owner

#[derive(Clone, Copy)]
enum Owner {
    Class(&'static ClassInfo),
    Variant(&'static UnionInfo, &'static VariantInfo),
}

impl Owner {
    fn name(self) -> &'static str {
        match self {
            Owner::Class(info) => info.ty().path(),
            Owner::Variant(info, _) => info.ty().path(),
        }
    }

    fn field(self, index: usize) -> Option<&'static FieldInfo> {
        match self {
            Owner::Class(info) => info.field(index),
            Owner::Variant(_, variant) => variant.fields().get(index),
        }
    }

    fn is_known(self, key: &str) -> bool {
        match self {
            Owner::Class(info) => info.slot(key).is_some(),
            Owner::Variant(_, variant) => variant.fields().iter().any(|f| f.matches(key)),
        }
    }

    fn denies_unknown(self) -> bool {
        match self {
            Owner::Class(info) => info.deny_unknown_fields(),
            Owner::Variant(..) => false,
        }
    }
}

// -----------------------------------------------------------------------------
// ClassAccess

/// Field-by-field reader of a mapping, for classes and struct variants.
///
/// Returned by [`Deserializer::class`] and [`Deserializer::struct_variant`].
/// Derived [`FromRepr`] code reads every field into a local, calls
/// [`finish`](Self::finish), and only then builds the instance.
///
/// Each field is looked up by its representation name, then by its
/// aliases. An absent field takes its declared default; an absent
/// optional field is `None`; otherwise the read fails with
/// [`ErrorKind::MissingField`]. A base field overridden by its owner is
/// treated as absent.
pub struct ClassAccess<'v> {
    value: &'v Value,
    map: &'v Mapping,
    owner: Owner,
    // `Some` when read as a base: the fields its owners override.
    hidden: Option<Vec<&'static FieldInfo>>,
}

impl<'p> Deserializer<'p> {
    /// Starts reading `value` as the class described by `declared`.
    pub fn class<'v>(
        &mut self,
        declared: &'static TypeInfo,
        value: &'v Value,
    ) -> Result<ClassAccess<'v>> {
        let hidden = self.take_flattened();
        let Some(info) = declared.as_class() else {
            return Err(self.reject(declared, value, "not a class type"));
        };
        if let Some(reason) = info.layout_error() {
            return Err(self.error(ErrorKind::InvalidClass {
                class: info.ty().path(),
                reason,
            }));
        }
        let map = self.map(declared, value)?;
        Ok(ClassAccess {
            value,
            map,
            owner: Owner::Class(info),
            hidden,
        })
    }

    /// Starts reading `value` as the fields of struct variant `index`.
    pub fn struct_variant<'v>(
        &mut self,
        declared: &'static TypeInfo,
        value: &'v Value,
        index: usize,
    ) -> Result<ClassAccess<'v>> {
        let Some((info, variant)) = declared
            .as_union()
            .and_then(|info| Some((info, info.variant_at(index)?)))
        else {
            return Err(self.reject(declared, value, "not a struct variant"));
        };
        let Some(map) = value.as_map() else {
            return Err(self.reject(declared, value, "expected a mapping"));
        };
        Ok(ClassAccess {
            value,
            map,
            owner: Owner::Variant(info, variant),
            hidden: None,
        })
    }
}

impl<'v> ClassAccess<'v> {
    fn lookup(&self, field: &FieldInfo) -> Option<&'v Value> {
        if let Some(value) = self.map.get(field.repr_name()) {
            return Some(value);
        }
        field.aliases().iter().find_map(|alias| self.map.get(alias))
    }

    fn is_hidden(&self, field: &FieldInfo) -> bool {
        self.hidden
            .as_ref()
            .is_some_and(|hidden| hidden.iter().any(|h| ptr::eq(*h, field)))
    }

    /// Reads own field `index` (position among the non-base fields).
    pub fn field<T: FromRepr>(&mut self, de: &mut Deserializer<'_>, index: usize) -> Result<T> {
        let Some(field) = self.owner.field(index) else {
            return Err(de.error(ErrorKind::Custom(
                format!("`{}` has no field at position {index}", self.owner.name()).into(),
            )));
        };

        let found = match field.skip() {
            Skip::Always => None,
            _ if self.is_hidden(field) => None,
            _ => self.lookup(field),
        };

        let segment = Segment::Field(field.repr_name().to_string());
        match found {
            Some(value) => de.nested(segment, |de| match field.deserializer() {
                Some(hook) => {
                    let boxed = hook(value).map_err(|e| e.or_at(de.path()))?;
                    boxed.take::<T>().ok_or_else(|| {
                        de.error(ErrorKind::Custom(
                            format!("deserializer of `{}` returned another type", field.name())
                                .into(),
                        ))
                    })
                }
                None => T::from_repr(value, de),
            }),
            None => self.absent(de, field, segment),
        }
    }

    fn absent<T: FromRepr>(
        &self,
        de: &mut Deserializer<'_>,
        field: &'static FieldInfo,
        segment: Segment,
    ) -> Result<T> {
        if let Some(default) = field.default_value() {
            return default.take::<T>().ok_or_else(|| {
                de.error(ErrorKind::Custom(
                    format!("default of `{}` has another type", field.name()).into(),
                ))
            });
        }
        if field.type_info().is_optional() {
            return de.nested(segment, |de| T::from_repr(&Value::Null, de));
        }
        de.nested(segment, |de| {
            Err(de.error(ErrorKind::MissingField {
                class: self.owner.name(),
                field: field.repr_name(),
            }))
        })
    }

    /// Reads base field `index` (position among the base fields).
    ///
    /// The base class is read from the same mapping as its owner, without
    /// the fields the owner overrides.
    pub fn base<T: FromRepr>(&mut self, de: &mut Deserializer<'_>, index: usize) -> Result<T> {
        let mut hidden = self.hidden.clone().unwrap_or_default();
        if let Owner::Class(info) = self.owner {
            if index >= info.bases().len() {
                return Err(de.error(ErrorKind::Custom(
                    format!("`{}` has no base at position {index}", info.ty().path()).into(),
                )));
            }
            hidden.extend_from_slice(info.overridden_fields());
        }
        de.flattened = Some(hidden);
        let result = T::from_repr(self.value, de);
        de.flattened = None;
        result
    }

    /// Completes the read, enforcing the unknown-field rule.
    pub fn finish(self, de: &mut Deserializer<'_>) -> Result<()> {
        if self.hidden.is_some() {
            return Ok(());
        }
        let deny = de.deny_unknown_fields || self.owner.denies_unknown();
        for key in self.map.keys() {
            if self.owner.is_known(key) {
                continue;
            }
            if deny {
                return Err(de.error(ErrorKind::UnknownField {
                    class: self.owner.name(),
                    field: key.to_string(),
                }));
            }
            tracing::trace!(class = self.owner.name(), key, "ignoring unknown field");
        }
        Ok(())
    }
}
