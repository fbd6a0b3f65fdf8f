use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::Reflect;
use crate::error::Result;
use crate::info::{TypeInfo, Typed};
use crate::value::Value;

/// Replaces the generic serializer for one field.
///
/// Receives the field value; the output is emitted without a policy check.
pub type SerializeHook = fn(&dyn Reflect) -> Result<Value>;

/// Replaces the generic deserializer for one field.
///
/// The returned box must hold exactly the field's type.
pub type DeserializeHook = fn(&Value) -> Result<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// Skip

/// When a field is left out of the representation.
#[derive(Clone, Copy, Default)]
pub enum Skip {
    #[default]
    Never,
    /// Never serialized; deserialization always uses the default.
    Always,
    /// Elided from the output when the predicate holds for the field value.
    If(fn(&dyn Reflect) -> bool),
}

impl fmt::Debug for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Never => f.write_str("Never"),
            Skip::Always => f.write_str("Always"),
            Skip::If(_) => f.write_str("If(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Descriptor of a named field of a class or struct variant.
///
/// Immutable once the owning descriptor is cached.
///
/// # Examples
///
/// ```
/// use conform_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect)]
/// struct Listen {
///     #[reflect(rename = "Addr", alias = "address")]
///     addr: String,
///     #[reflect(default)]
///     backlog: u32,
/// }
///
/// let info = Listen::type_info().as_class().unwrap();
/// let addr = info.field(0).unwrap();
///
/// assert_eq!(addr.name(), "addr");
/// assert_eq!(addr.repr_name(), "Addr");
/// assert_eq!(addr.aliases(), ["address"]);
/// assert!(info.field(1).unwrap().has_default());
/// ```
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    repr_name: &'static str,
    aliases: &'static [&'static str],
    index: usize,
    type_id: TypeId,
    type_info: fn() -> &'static TypeInfo,
    default: Option<fn() -> Box<dyn Reflect>>,
    skip: Skip,
    serialize_with: Option<SerializeHook>,
    deserialize_with: Option<DeserializeHook>,
}

impl FieldInfo {
    /// Creates a descriptor for the field `name` of type `T` at Rust
    /// position `index`.
    #[inline]
    pub fn new<T: Typed>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            repr_name: name,
            aliases: &[],
            index,
            type_id: TypeId::of::<T>(),
            type_info: T::type_info,
            default: None,
            skip: Skip::Never,
            serialize_with: None,
            deserialize_with: None,
        }
    }

    /// Sets the key used in the representation.
    #[inline]
    pub fn with_repr_name(mut self, repr_name: &'static str) -> Self {
        self.repr_name = repr_name;
        self
    }

    /// Sets additional keys accepted when deserializing.
    #[inline]
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    #[inline]
    pub fn with_default(mut self, default: fn() -> Box<dyn Reflect>) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub fn with_skip(mut self, skip: Skip) -> Self {
        self.skip = skip;
        self
    }

    #[inline]
    pub fn with_serializer(mut self, hook: SerializeHook) -> Self {
        self.serialize_with = Some(hook);
        self
    }

    #[inline]
    pub fn with_deserializer(mut self, hook: DeserializeHook) -> Self {
        self.deserialize_with = Some(hook);
        self
    }

    /// The Rust identifier.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The key in the representation.
    #[inline]
    pub const fn repr_name(&self) -> &'static str {
        self.repr_name
    }

    #[inline]
    pub const fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// Whether `key` names this field, by representation name or alias.
    #[inline]
    pub fn matches(&self, key: &str) -> bool {
        self.repr_name == key || self.aliases.contains(&key)
    }

    /// Position of the field in the Rust definition.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The declared type's descriptor, built on first access.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// A fresh default value, if the field declares one.
    #[inline]
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default.map(|f| f())
    }

    #[inline]
    pub const fn skip(&self) -> Skip {
        self.skip
    }

    #[inline]
    pub const fn serializer(&self) -> Option<SerializeHook> {
        self.serialize_with
    }

    #[inline]
    pub const fn deserializer(&self) -> Option<DeserializeHook> {
        self.deserialize_with
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("repr_name", &self.repr_name)
            .field("aliases", &self.aliases)
            .field("index", &self.index)
            .field("has_default", &self.default.is_some())
            .field("skip", &self.skip)
            .field("serialize_with", &self.serialize_with.is_some())
            .field("deserialize_with", &self.deserialize_with.is_some())
            .finish()
    }
}
