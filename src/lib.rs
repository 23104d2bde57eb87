//! Metabind - declarative metadata decoder
//!
//! Populates typed fields and setters from a loosely typed key/value
//! manifest, resolving resource handles and class identifiers on the way.

pub mod binding;
pub mod classes;
pub mod coercion;
pub mod context;
pub mod decoder;
pub mod error;
pub mod kind;
pub mod options;
pub mod resources;
pub mod store;
pub mod value;

pub use binding::{BindReport, Binding, BindingDeclaration, Bindings, MemberKind, MetadataBound};
pub use classes::{ClassLoader, TypeHandle, TypeRegistry};
pub use coercion::{CoercionRegistry, ResolverFn};
pub use context::{AppContext, DecoderCell, HostContext};
pub use decoder::Decoder;
pub use error::{FixSuggestion, MetabindError, Result};
pub use kind::Kind;
pub use options::{BindMode, DecoderOptions};
pub use resources::{InMemoryResources, ResourceResolver};
pub use store::{Manifest, ManifestFile, ManifestStr, MetadataSource, MetadataStore};
pub use value::{AnimationHandle, DrawableHandle, FromValue, OpaqueHandle, TargetType, Value};
