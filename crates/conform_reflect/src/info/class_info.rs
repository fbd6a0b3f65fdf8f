use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::sync::OnceLock;

use conform_utils::hash::HashMap;

use crate::info::{FieldInfo, Type, TypeInfo};

// -----------------------------------------------------------------------------
// BaseInfo

/// A field marked `#[reflect(base)]`.
///
/// The base class's fields are inlined into the owner's representation.
#[derive(Clone)]
pub struct BaseInfo {
    name: &'static str,
    index: usize,
    type_info: fn() -> &'static TypeInfo,
}

impl BaseInfo {
    #[inline]
    pub fn new<T: crate::info::Typed>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            index,
            type_info: T::type_info,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Position of the base field in the Rust definition.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}

impl fmt::Debug for BaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseInfo")
            .field("name", &self.name)
            .field("index", &self.index)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Slot

/// One entry of a class representation.
///
/// `route` holds the Rust field positions from the class down to the value:
/// a single index for own fields, one extra leading index per base level
/// for inherited fields.
#[derive(Debug)]
pub struct Slot {
    route: Box<[usize]>,
    field: &'static FieldInfo,
}

impl Slot {
    #[inline]
    pub fn route(&self) -> &[usize] {
        &self.route
    }

    #[inline]
    pub fn field(&self) -> &'static FieldInfo {
        self.field
    }

    #[inline]
    pub fn is_inherited(&self) -> bool {
        self.route.len() > 1
    }
}

struct Layout {
    slots: Box<[Slot]>,
    // Representation names and aliases to slot positions.
    keys: HashMap<&'static str, usize>,
    // Inherited fields replaced by an own field of the same name.
    overridden: Box<[&'static FieldInfo]>,
    error: Option<String>,
}

// -----------------------------------------------------------------------------
// ClassInfo

/// Descriptor of a user-defined struct with named fields.
///
/// `fields` lists the own fields in declaration order, excluding base
/// fields. The full representation, inherited fields included, is given by
/// [`slots`](Self::slots): fields of each base come first in the base's
/// order, then own fields; an own field whose representation name equals
/// an inherited one takes its place.
///
/// An overridden inherited field is never read from the representation:
/// the base keeps its default, or `None` when optional. A base whose type is
/// not a class, or an override of a field that has neither, makes the
/// class invalid; see [`layout_error`](Self::layout_error).
pub struct ClassInfo {
    ty: Type,
    fields: Box<[FieldInfo]>,
    bases: Box<[BaseInfo]>,
    deny_unknown_fields: bool,
    layout: OnceLock<Layout>,
}

impl ClassInfo {
    pub fn new<T: 'static>(fields: Vec<FieldInfo>) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.into_boxed_slice(),
            bases: Box::new([]),
            deny_unknown_fields: false,
            layout: OnceLock::new(),
        }
    }

    #[inline]
    pub fn with_bases(mut self, bases: Vec<BaseInfo>) -> Self {
        self.bases = bases.into_boxed_slice();
        self
    }

    #[inline]
    pub fn with_deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Own field at `index` in the `fields` list.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn bases(&self) -> &[BaseInfo] {
        &self.bases
    }

    #[inline]
    pub const fn deny_unknown_fields(&self) -> bool {
        self.deny_unknown_fields
    }

    /// The representation entries, inherited fields included.
    ///
    /// Computed once on first access.
    pub fn slots(&'static self) -> &'static [Slot] {
        &self.layout().slots
    }

    /// The slot a representation key belongs to, by name or alias.
    pub fn slot(&'static self, key: &str) -> Option<&'static Slot> {
        let layout = self.layout();
        layout.keys.get(key).map(|&i| &layout.slots[i])
    }

    /// Inherited fields replaced by an own field of this class.
    pub fn overridden_fields(&'static self) -> &'static [&'static FieldInfo] {
        &self.layout().overridden
    }

    /// Why this class cannot be serialized or deserialized, if it cannot.
    pub fn layout_error(&'static self) -> Option<&'static str> {
        self.layout().error.as_deref()
    }

    fn layout(&'static self) -> &'static Layout {
        self.layout.get_or_init(|| {
            let mut slots: Vec<Slot> = Vec::with_capacity(self.fields.len());
            let mut overridden: Vec<&'static FieldInfo> = Vec::new();
            let mut error = None;

            for base in &self.bases {
                let Some(base_info) = base.type_info().as_class() else {
                    error.get_or_insert_with(|| {
                        format!("base field `{}` is not a class", base.name)
                    });
                    continue;
                };
                if let Some(reason) = base_info.layout_error() {
                    error.get_or_insert_with(|| format!("base `{}`: {reason}", base.name));
                }
                for inherited in base_info.slots() {
                    let mut route = Vec::with_capacity(inherited.route.len() + 1);
                    route.push(base.index);
                    route.extend_from_slice(&inherited.route);
                    slots.push(Slot {
                        route: route.into_boxed_slice(),
                        field: inherited.field,
                    });
                }
            }

            for field in &self.fields {
                let slot = Slot {
                    route: Box::new([field.index()]),
                    field,
                };
                match slots
                    .iter()
                    .position(|s| s.field.repr_name() == field.repr_name())
                {
                    Some(pos) => {
                        let replaced = core::mem::replace(&mut slots[pos], slot).field;
                        if !replaced.has_default() && !replaced.type_info().is_optional() {
                            error.get_or_insert_with(|| {
                                format!(
                                    "field `{}` overrides an inherited field that has no default",
                                    field.name()
                                )
                            });
                        }
                        overridden.push(replaced);
                    }
                    None => slots.push(slot),
                }
            }

            let mut keys = HashMap::default();
            for (i, slot) in slots.iter().enumerate() {
                keys.insert(slot.field.repr_name(), i);
                for alias in slot.field.aliases() {
                    keys.entry(*alias).or_insert(i);
                }
            }

            match &error {
                Some(reason) => {
                    tracing::warn!(class = self.ty.path(), %reason, "invalid class layout");
                }
                None => tracing::trace!(
                    class = self.ty.path(),
                    slots = slots.len(),
                    "class layout built"
                ),
            }

            Layout {
                slots: slots.into_boxed_slice(),
                keys,
                overridden: overridden.into_boxed_slice(),
                error,
            }
        })
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("ty", &self.ty)
            .field("fields", &self.fields)
            .field("bases", &self.bases)
            .field("deny_unknown_fields", &self.deny_unknown_fields)
            .finish()
    }
}
