//! Manifest loading - YAML/JSON metadata sources
//!
//! ```yaml
//! package: com.example.app
//! meta-data:
//!   greeting: "Hello, World!"
//!   answer: 42
//!   icon: 2130837505      # resource handle, bound with indirect
//!   palette: [1, 2, 3]
//! decoder:
//!   mode: best-effort
//! ```
//!
//! Values must be scalars or integer lists; `null` and nested maps are
//! rejected when the store is built.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::metadata::{MetadataSource, MetadataStore};
use crate::error::{MetabindError, Result};
use crate::options::DecoderOptions;
use crate::value::Value;

/// Parsed manifest document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub meta_data: BTreeMap<String, JsonValue>,

    #[serde(default)]
    pub decoder: DecoderOptions,
}

impl Manifest {
    /// Parse YAML (JSON documents are accepted too)
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Convert the `meta-data` section into a store
    pub fn to_store(&self) -> Result<MetadataStore> {
        let entries = self
            .meta_data
            .iter()
            .map(|(key, raw)| value_from_json(key, raw).map(|v| (key.clone(), v)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            package = self.package.as_deref().unwrap_or("<unnamed>"),
            entries = entries.len(),
            "loaded manifest metadata"
        );
        Ok(MetadataStore::from_entries(entries))
    }
}

/// Convert one manifest value into a store value
fn value_from_json(key: &str, raw: &JsonValue) -> Result<Value> {
    let invalid = |reason: &str| MetabindError::InvalidManifestValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match raw {
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if n.is_u64() {
                Err(invalid("integer out of range"))
            } else {
                n.as_f64().map(Value::Float).ok_or_else(|| invalid("unrepresentable number"))
            }
        }
        JsonValue::Array(items) => items
            .iter()
            .map(JsonValue::as_i64)
            .collect::<Option<Vec<_>>>()
            .map(Value::IntArray)
            .ok_or_else(|| invalid("lists may only contain integers")),
        JsonValue::Null => Err(invalid("null values are not allowed")),
        JsonValue::Object(_) => Err(invalid("nested maps are not supported")),
    }
}

// ============================================================================
// SOURCES
// ============================================================================

/// Manifest file on disk, read on every `load`
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetadataSource for ManifestFile {
    fn load(&self) -> Result<MetadataStore> {
        let manifest =
            Manifest::from_path(&self.path).map_err(|e| MetabindError::StoreUnavailable {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
        manifest.to_store()
    }
}

/// Inline manifest text
#[derive(Debug, Clone)]
pub struct ManifestStr(pub String);

impl MetadataSource for ManifestStr {
    fn load(&self) -> Result<MetadataStore> {
        let manifest =
            Manifest::from_yaml_str(&self.0).map_err(|e| MetabindError::StoreUnavailable {
                reason: e.to_string(),
            })?;
        manifest.to_store()
    }
}
