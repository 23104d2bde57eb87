//! Store Module - metadata storage and providers
//!
//! Read-only key → value storage the decoder consumes, and the sources that
//! produce it.
//!
//! Key types:
//! - `MetadataStore`: shared, immutable key → `Value` map
//! - `MetadataSource`: anything that can produce a store (may fail)
//! - `Manifest`: YAML/JSON manifest with a `meta-data` section

mod manifest;
mod metadata;

// Re-export all public types
pub use manifest::{Manifest, ManifestFile, ManifestStr};
pub use metadata::{MetadataSource, MetadataStore};
