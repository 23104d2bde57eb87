//! Error types with fix suggestions
//!
//! Every variant carries a stable `META-NNN` code in its message so hosts can
//! match on failures in logs without depending on the enum layout.

use thiserror::Error;

use crate::kind::Kind;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum MetabindError {
    // ─────────────────────────────────────────────────────────────
    // Resolution errors (META-001 to META-008)
    // ─────────────────────────────────────────────────────────────

    #[error("META-001: '{key}' not defined in metadata")]
    MissingBinding { key: String },

    #[error("META-002: '{key}' expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("META-003: cannot assign {found} value of '{key}' to {target}")]
    IncompatibleValue {
        key: String,
        target: &'static str,
        found: &'static str,
    },

    #[error("META-004: no conversion from resource '{key}' to {target} (add a kind hint)")]
    NoConversion { key: String, target: &'static str },

    #[error("META-005: cannot load class '{name}': {reason}")]
    ClassResolution { name: String, reason: String },

    #[error("META-006: resource {handle:#x} of kind {kind} not found")]
    ResourceNotFound { handle: i32, kind: Kind },

    #[error("META-007: '{name}' is not a valid qualified class name")]
    InvalidClassName { name: String },

    #[error("META-008: no resolver registered for kind {kind}")]
    UnsupportedKind { kind: Kind },

    // ─────────────────────────────────────────────────────────────
    // Declaration errors (META-010)
    // ─────────────────────────────────────────────────────────────

    #[error("META-010: method binding '{member}' must declare a key")]
    MissingMethodKey { member: String },

    // ─────────────────────────────────────────────────────────────
    // Store errors (META-020 to META-021)
    // ─────────────────────────────────────────────────────────────

    #[error("META-020: metadata store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("META-021: invalid manifest value for '{key}': {reason}")]
    InvalidManifestValue { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetabindError {
    /// Whether the target is left unsafe to keep using.
    ///
    /// Every error stops a bind. Class resolution is the one that leaves a
    /// required type missing from a partially bound target.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MetabindError::ClassResolution { .. })
    }

    /// Stable error code (e.g. `META-001`), if the variant has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            MetabindError::MissingBinding { .. } => Some("META-001"),
            MetabindError::TypeMismatch { .. } => Some("META-002"),
            MetabindError::IncompatibleValue { .. } => Some("META-003"),
            MetabindError::NoConversion { .. } => Some("META-004"),
            MetabindError::ClassResolution { .. } => Some("META-005"),
            MetabindError::ResourceNotFound { .. } => Some("META-006"),
            MetabindError::InvalidClassName { .. } => Some("META-007"),
            MetabindError::UnsupportedKind { .. } => Some("META-008"),
            MetabindError::MissingMethodKey { .. } => Some("META-010"),
            MetabindError::StoreUnavailable { .. } => Some("META-020"),
            MetabindError::InvalidManifestValue { .. } => Some("META-021"),
            MetabindError::Io(_) | MetabindError::Yaml(_) | MetabindError::Json(_) => None,
        }
    }
}

impl FixSuggestion for MetabindError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            MetabindError::MissingBinding { .. } => {
                Some("Add the key to the manifest's meta-data section")
            }
            MetabindError::TypeMismatch { .. } => {
                Some("Indirect bindings need an integer resource handle in the manifest")
            }
            MetabindError::IncompatibleValue { .. } => {
                Some("Change the member type or the manifest value so they agree")
            }
            MetabindError::NoConversion { .. } => {
                Some("Declare an explicit kind on the binding")
            }
            MetabindError::ClassResolution { .. } => {
                Some("Register the type with the class loader under its qualified name")
            }
            MetabindError::ResourceNotFound { .. } => {
                Some("Check the resource handle in the manifest")
            }
            MetabindError::InvalidClassName { .. } => {
                Some("Use a dotted name such as com.example.Worker")
            }
            MetabindError::UnsupportedKind { .. } => {
                Some("Register a resolver for this kind in the coercion registry")
            }
            MetabindError::MissingMethodKey { .. } => {
                Some("Method bindings cannot fall back to the member name; pass a key")
            }
            MetabindError::StoreUnavailable { .. } => {
                Some("Check that the manifest exists and is readable")
            }
            MetabindError::InvalidManifestValue { .. } => {
                Some("Meta-data values must be strings, numbers, booleans or integer lists")
            }
            MetabindError::Io(_) => Some("Check file path and permissions"),
            MetabindError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            MetabindError::Json(_) => Some("Check JSON syntax"),
        }
    }
}

pub type Result<T, E = MetabindError> = std::result::Result<T, E>;
