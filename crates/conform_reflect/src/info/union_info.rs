use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{FieldInfo, Type, TypeInfo};

// -----------------------------------------------------------------------------
// Tagging

/// How the discriminator of a union is placed in the representation.
///
/// For a variant `Circle { r: 1.0 }`:
///
/// | mode | representation |
/// |---|---|
/// | `Internal { tag: "type" }` | `{"type": "Circle", "r": 1.0}` |
/// | `External` | `{"Circle": {"r": 1.0}}` |
/// | `Adjacent { tag: "t", content: "c" }` | `{"t": "Circle", "c": {"r": 1.0}}` |
/// | `Untagged` | `{"r": 1.0}` |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tagging {
    Internal { tag: &'static str },
    External,
    Adjacent {
        tag: &'static str,
        content: &'static str,
    },
    Untagged,
}

impl Default for Tagging {
    #[inline]
    fn default() -> Self {
        Tagging::Internal { tag: "type" }
    }
}

// -----------------------------------------------------------------------------
// VariantKind

/// The payload shape of a variant.
pub enum VariantKind {
    Unit,
    /// A single unnamed field, represented as the inner value.
    Newtype(fn() -> &'static TypeInfo),
    /// Several unnamed fields, represented as a sequence.
    Tuple(Box<[fn() -> &'static TypeInfo]>),
    /// Named fields, represented as a mapping.
    Struct(Box<[FieldInfo]>),
}

impl fmt::Debug for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKind::Unit => f.write_str("Unit"),
            VariantKind::Newtype(_) => f.write_str("Newtype"),
            VariantKind::Tuple(items) => write!(f, "Tuple({})", items.len()),
            VariantKind::Struct(fields) => f.debug_tuple("Struct").field(fields).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// VariantInfo

#[derive(Debug)]
pub struct VariantInfo {
    name: &'static str,
    tag: &'static str,
    aliases: &'static [&'static str],
    kind: VariantKind,
}

impl VariantInfo {
    /// A variant whose tag is its Rust name.
    #[inline]
    pub fn new(name: &'static str, kind: VariantKind) -> Self {
        Self {
            name,
            tag: name,
            aliases: &[],
            kind,
        }
    }

    #[inline]
    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    #[inline]
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// The Rust identifier.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The discriminator value.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    #[inline]
    pub const fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    #[inline]
    pub const fn kind(&self) -> &VariantKind {
        &self.kind
    }

    /// Named fields of a struct variant, empty otherwise.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        match &self.kind {
            VariantKind::Struct(fields) => fields,
            _ => &[],
        }
    }
}

// -----------------------------------------------------------------------------
// UnionInfo

/// Descriptor of an enum: a closed set of tagged variants.
#[derive(Debug)]
pub struct UnionInfo {
    ty: Type,
    variants: Box<[VariantInfo]>,
    tagging: Tagging,
}

impl UnionInfo {
    pub fn new<T: 'static>(variants: Vec<VariantInfo>) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into_boxed_slice(),
            tagging: Tagging::default(),
        }
    }

    #[inline]
    pub fn with_tagging(mut self, tagging: Tagging) -> Self {
        self.tagging = tagging;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn tagging(&self) -> Tagging {
        self.tagging
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    #[inline]
    pub fn variant_at(&self, index: usize) -> Option<&VariantInfo> {
        self.variants.get(index)
    }

    /// Position of the variant whose tag or alias equals `tag`.
    pub fn index_of_tag(&self, tag: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|v| v.tag == tag || v.aliases.contains(&tag))
    }
}
