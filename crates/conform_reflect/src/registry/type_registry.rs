use alloc::string::{String, ToString};
use core::any::TypeId;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use conform_utils::TypeIdMap;
use conform_utils::hash::{FixedHashState, HashMap, HashSet};

use crate::error::{Error, ErrorKind, Result};
use crate::info::{TypeInfo, Typed};
use crate::registry::TypeMeta;
use crate::{ByteBuf, FromRepr, Reflect};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types.
///
/// Maps `TypeId`, full type path and short type name to a [`TypeMeta`].
/// Short names that several registered types share are ambiguous and
/// resolve to nothing; the full path always resolves.
///
/// # Example
///
/// ```
/// use conform_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.get_with_type_name("String").unwrap();
/// assert_eq!(meta.ty().path(), "alloc::string::String");
/// assert!(registry.resolve("Strin").is_err());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    auto_registered: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
            auto_registered: false,
        }
    }

    /// Creates a type registry with the scalar types registered.
    ///
    /// - `()` `bool` `char` `String`
    /// - `i8 - i64` `isize` `u8 - u64` `usize`
    /// - `f32` `f64`
    /// - `ByteBuf` `Value`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<ByteBuf>();
        registry.register::<crate::value::Value>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, type_meta.type_id());
            }
        }

        type_path_to_id.insert(ty.path(), type_meta.type_id());
    }

    /// Adds `type_meta` unless its type is already registered.
    ///
    /// Returns whether it was added.
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        self.type_meta_table.try_insert(type_meta.type_id(), || {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            type_meta
        })
    }

    /// Registers `T` if it is not registered yet.
    ///
    /// Transparent pointers (`Box<T>`, ...) share the paths of their
    /// pointee; register the pointee instead.
    ///
    /// # Example
    ///
    /// ```
    /// use core::any::TypeId;
    /// use conform_reflect::{derive::Reflect, registry::TypeRegistry};
    ///
    /// #[derive(Reflect)]
    /// struct Foo {
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<Foo>();
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// assert!(registry.get_with_type_name("Foo").is_some());
    /// ```
    #[inline]
    pub fn register<T: Typed + Reflect + FromRepr>(&mut self) {
        if self.try_insert_type_meta(TypeMeta::of::<T>()) {
            tracing::trace!(type_path = T::type_info().type_path(), "type registered");
        }
    }

    /// Registers every type annotated with `#[reflect(auto_register)]`.
    ///
    /// Repeated calls are cheap and do not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current
    /// platform, `false` otherwise.
    ///
    /// ## Feature Dependency
    ///
    /// Requires the `auto_register` feature. When disabled, this does
    /// nothing and returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use core::any::TypeId;
    /// use conform_reflect::{derive::Reflect, registry::TypeRegistry};
    ///
    /// #[derive(Reflect)]
    /// #[reflect(auto_register)]
    /// struct Foo {
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// ```
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if self.auto_registered {
                return true;
            }
            crate::__macro_exports::auto_register::__register_types(self);
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[cfg_attr(
        not(feature = "auto_register"),
        expect(dead_code, reason = "only auto registration sets the flag")
    )]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// The [`TypeMeta`] of the type with the given full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// The [`TypeMeta`] of the type with the given short name.
    ///
    /// `None` if the name is ambiguous or unknown.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Whether the short name matches several registered types.
    ///
    /// # Example
    ///
    /// ```
    /// # use conform_reflect::registry::TypeRegistry;
    /// # mod foo {
    /// #     use conform_reflect::derive::Reflect;
    /// #     #[derive(Reflect)]
    /// #     pub struct MyType;
    /// # }
    /// # mod bar {
    /// #     use conform_reflect::derive::Reflect;
    /// #     #[derive(Reflect)]
    /// #     pub struct MyType;
    /// # }
    /// let mut registry = TypeRegistry::default();
    /// registry.register::<foo::MyType>();
    /// registry.register::<bar::MyType>();
    /// assert!(registry.is_ambiguous("MyType"));
    /// assert!(registry.get_with_type_name("MyType").is_none());
    /// ```
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Looks a type up by full path, then by short name.
    ///
    /// Fails with [`ErrorKind::UnresolvedType`] when neither matches.
    pub fn resolve(&self, name: &str) -> Result<&TypeMeta> {
        if let Some(meta) = self
            .get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
        {
            return Ok(meta);
        }
        tracing::debug!(
            name,
            ambiguous = self.is_ambiguous(name),
            "type not resolved in registry"
        );
        Err(Error::new(ErrorKind::UnresolvedType {
            name: name.to_string(),
        }))
    }

    #[inline]
    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.get(type_id).map(TypeMeta::type_info)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A [`TypeRegistry`] behind a shared lock.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&*self.read(), f)
    }
}

/// The process-wide registry.
///
/// Created on first access with the scalar types and every
/// auto-registered type.
pub fn global() -> &'static TypeRegistryArc {
    static GLOBAL: LazyLock<TypeRegistryArc> = LazyLock::new(|| {
        let mut registry = TypeRegistry::new();
        registry.auto_register();
        TypeRegistryArc {
            internal: Arc::new(RwLock::new(registry)),
        }
    });
    &GLOBAL
}
