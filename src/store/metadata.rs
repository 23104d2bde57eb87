//! MetadataStore - immutable key → value map
//!
//! Built once per application context and shared behind an `Arc`, so
//! cloning a store is O(1) and concurrent readers need no locking.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::value::Value;

/// Read-only metadata shared by every decoder bound to one context
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    entries: Arc<FxHashMap<String, Value>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` pairs; later duplicates win
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<FxHashMap<_, _>>();
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Return a copy of this store with one more entry
    ///
    /// Stores are immutable once shared; this clones the map.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Producer of a metadata store
///
/// Failures should be reported as `StoreUnavailable`; the decoder passes
/// them through unchanged.
pub trait MetadataSource: Send + Sync {
    fn load(&self) -> Result<MetadataStore>;
}

impl MetadataSource for MetadataStore {
    fn load(&self) -> Result<MetadataStore> {
        Ok(self.clone())
    }
}
