//! Class loading - class-identifier resolution
//!
//! A member whose declared type is a class identifier receives a `TypeHandle`
//! looked up by qualified name (e.g. `com.example.Worker`). Rust has no
//! runtime class path, so `TypeRegistry` is the loader: hosts register the
//! types a manifest may name, optionally with a factory for instantiation.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MetabindError, Result};

/// Dotted identifier: `Worker`, `com.example.Worker`, `a.b.Outer$Inner`
static CLASS_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
});

/// Check that `name` is a syntactically valid qualified class name
pub fn validate_class_name(name: &str) -> Result<()> {
    if CLASS_NAME.is_match(name) {
        Ok(())
    } else {
        Err(MetabindError::InvalidClassName {
            name: name.to_string(),
        })
    }
}

type Factory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Loaded class identifier
#[derive(Clone)]
pub struct TypeHandle {
    name: Arc<str>,
    type_id: TypeId,
    type_name: &'static str,
    factory: Option<Factory>,
}

impl TypeHandle {
    /// Handle for `T` under the qualified name `name`
    pub fn of<T: Any>(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            factory: None,
        }
    }

    /// Attach a constructor used by [`TypeHandle::instantiate`]
    pub fn with_factory<T, F>(mut self, factory: F) -> Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>));
        self
    }

    /// Qualified name the handle was loaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name (diagnostics only, not stable)
    pub fn rust_type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Construct a fresh instance via the registered factory
    ///
    /// Returns `None` when the type was registered without one.
    pub fn instantiate(&self) -> Option<Box<dyn Any + Send>> {
        self.factory.as_ref().map(|f| f())
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("instantiable", &self.factory.is_some())
            .finish()
    }
}

// ============================================================================
// CLASS LOADER
// ============================================================================

/// Maps a class name to a loaded type handle
///
/// Any error returned here aborts the enclosing bind.
pub trait ClassLoader: Send + Sync {
    fn load_class(&self, name: &str) -> Result<TypeHandle>;
}

/// Class loader backed by explicit registration
#[derive(Default)]
pub struct TypeRegistry {
    types: DashMap<Arc<str>, TypeHandle>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name`, replacing any previous registration
    pub fn register<T: Any>(&self, name: &str) -> Result<TypeHandle> {
        self.insert(name, TypeHandle::of::<T>(name))
    }

    /// Register `T` with a constructor so the handle can instantiate it
    pub fn register_with_factory<T, F>(&self, name: &str, factory: F) -> Result<TypeHandle>
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(name, TypeHandle::of::<T>(name).with_factory(factory))
    }

    /// Register a `Default` type; instantiation uses `T::default()`
    pub fn register_default<T: Any + Send + Default>(&self, name: &str) -> Result<TypeHandle> {
        self.register_with_factory(name, T::default)
    }

    fn insert(&self, name: &str, handle: TypeHandle) -> Result<TypeHandle> {
        validate_class_name(name)?;
        self.types.insert(Arc::from(name), handle.clone());
        Ok(handle)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ClassLoader for TypeRegistry {
    fn load_class(&self, name: &str) -> Result<TypeHandle> {
        validate_class_name(name)?;
        self.types
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| MetabindError::ClassResolution {
                name: name.to_string(),
                reason: "no type registered under this name".into(),
            })
    }
}
