//! Decoder - value resolution and object binding
//!
//! Owns one metadata store and the collaborators needed to turn its raw
//! values into member values: the resource backend, the class loader and the
//! coercion registry.
//!
//! Resolution of one key:
//! ```text
//! store lookup ──absent──→ MissingBinding
//!      │
//!      ├─ direct ─────────────────────────────┐
//!      │                                      │
//!      └─ indirect: integer handle            │
//!            kind = hint, else inferred       │
//!            (none inferred → Ok(None))       │
//!            registry[kind](resources, handle)│
//!                                             ↓
//!                            target ClassId? → class loader
//!                                             ↓
//!                                          Some(value)
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::binding::{BindReport, Bindings, MetadataBound};
use crate::classes::ClassLoader;
use crate::coercion::CoercionRegistry;
use crate::error::{MetabindError, Result};
use crate::kind::Kind;
use crate::options::{BindMode, DecoderOptions};
use crate::resources::ResourceResolver;
use crate::store::{MetadataSource, MetadataStore};
use crate::value::{coerce, FromValue, TargetType, Value};

/// Metadata decoder bound to one application context
///
/// Immutable once built; share it behind an `Arc`.
pub struct Decoder {
    store: MetadataStore,
    resources: Arc<dyn ResourceResolver>,
    classes: Arc<dyn ClassLoader>,
    registry: CoercionRegistry,
    options: DecoderOptions,
}

impl Decoder {
    /// Decoder with the standard coercion registry and default options
    pub fn new(
        store: MetadataStore,
        resources: Arc<dyn ResourceResolver>,
        classes: Arc<dyn ClassLoader>,
    ) -> Self {
        Self {
            store,
            resources,
            classes,
            registry: CoercionRegistry::default(),
            options: DecoderOptions::default(),
        }
    }

    /// Load the store from `source`; its error is returned unchanged
    pub fn from_source(
        source: &dyn MetadataSource,
        resources: Arc<dyn ResourceResolver>,
        classes: Arc<dyn ClassLoader>,
    ) -> Result<Self> {
        let store = source.load()?;
        Ok(Self::new(store, resources, classes))
    }

    /// Replace the coercion registry
    pub fn with_registry(mut self, registry: CoercionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.store
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn registry(&self) -> &CoercionRegistry {
        &self.registry
    }

    // ========================================================================
    // VALUE LOOKUP
    // ========================================================================

    /// String value of `key`, if present and a string
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.store.get(key).and_then(Value::as_str)
    }

    /// Direct value of `key`, converted to `T`
    pub fn value<T: FromValue>(&self, key: &str) -> Result<T> {
        self.value_with(key, false, Kind::Auto)
    }

    /// Value of the resource whose handle is stored under `key`
    pub fn value_from_resource<T: FromValue>(&self, key: &str) -> Result<T> {
        self.value_with(key, true, Kind::Auto)
    }

    /// Fully specified lookup
    ///
    /// An indirect lookup with no applicable kind fails with `NoConversion`
    /// since there is no absent `T` to return.
    pub fn value_with<T: FromValue>(&self, key: &str, indirect: bool, kind: Kind) -> Result<T> {
        match self.resolve(key, indirect, kind, T::TARGET)? {
            Some(value) => coerce(key, value),
            None => Err(MetabindError::NoConversion {
                key: key.to_string(),
                target: T::TYPE_NAME,
            }),
        }
    }

    /// Resolve `key` for a member of type `target`
    ///
    /// `Ok(None)` means the binding is indirect and no kind could be
    /// inferred for `target`; callers treat that as "leave unset".
    pub fn resolve(
        &self,
        key: &str,
        indirect: bool,
        kind_hint: Kind,
        target: TargetType,
    ) -> Result<Option<Value>> {
        let raw = self.store.get(key).ok_or_else(|| MetabindError::MissingBinding {
            key: key.to_string(),
        })?;

        let candidate = if indirect {
            match self.resolve_resource(key, raw, kind_hint, target)? {
                Some(value) => value,
                None => return Ok(None),
            }
        } else {
            raw.clone()
        };

        if target == TargetType::ClassId {
            return self.load_class(key, candidate).map(Some);
        }

        Ok(Some(candidate))
    }

    fn resolve_resource(
        &self,
        key: &str,
        raw: &Value,
        kind_hint: Kind,
        target: TargetType,
    ) -> Result<Option<Value>> {
        let handle = raw.as_handle().ok_or_else(|| MetabindError::TypeMismatch {
            key: key.to_string(),
            expected: "integer resource handle",
            found: raw.type_name(),
        })?;

        let kind = if kind_hint.is_auto() {
            match self.registry.infer_kind(target) {
                Some(kind) => kind,
                None => {
                    debug!(key, ?target, "no resource kind inferable");
                    return Ok(None);
                }
            }
        } else {
            kind_hint
        };

        let resolve = self.registry.resolve_by_kind(kind)?;
        resolve(self.resources.as_ref(), handle).map(Some)
    }

    fn load_class(&self, key: &str, candidate: Value) -> Result<Value> {
        let name = match candidate {
            Value::String(name) => name,
            other => {
                return Err(MetabindError::TypeMismatch {
                    key: key.to_string(),
                    expected: "class name string",
                    found: other.type_name(),
                })
            }
        };

        let handle = self.classes.load_class(&name).map_err(|e| match e {
            e @ MetabindError::ClassResolution { .. } => e,
            other => MetabindError::ClassResolution {
                name: name.clone(),
                reason: other.to_string(),
            },
        })?;

        Ok(Value::Type(handle))
    }

    // ========================================================================
    // OBJECT BINDING
    // ========================================================================

    /// Populate `target` from its registered bindings
    ///
    /// Best-effort: absent keys are skipped, and an error leaves members
    /// bound before it in place.
    pub fn bind<T: MetadataBound>(&self, target: &mut T) -> Result<BindReport> {
        self.bind_with(target, T::bindings())
    }

    /// Populate `target` from an explicit binding table
    pub fn bind_with<T>(&self, target: &mut T, bindings: &Bindings<T>) -> Result<BindReport> {
        bindings.apply(self, target)
    }

    /// All-or-nothing bind: `target` is only updated if every member succeeds
    pub fn bind_atomic<T: MetadataBound + Clone>(&self, target: &mut T) -> Result<BindReport> {
        let mut staged = target.clone();
        let report = self.bind(&mut staged)?;
        *target = staged;
        Ok(report)
    }

    /// Bind using the mode from this decoder's options
    pub fn bind_configured<T: MetadataBound + Clone>(&self, target: &mut T) -> Result<BindReport> {
        match self.options.mode {
            BindMode::BestEffort => self.bind(target),
            BindMode::AllOrNothing => self.bind_atomic(target),
        }
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("entries", &self.store.len())
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
