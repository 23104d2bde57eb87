//! Binding Module - declarative member bindings
//!
//! Describes how members of a target type are populated from metadata:
//! - `declaration`: pure data for one binding (key, indirect flag, kind hint)
//! - `binder`: per-type binding tables and the loop that applies them
//!
//! Targets register their members once, in the order fields then methods:
//!
//! ```rust
//! use metabind::{BindingDeclaration, Bindings, Kind, MetadataBound};
//! use once_cell::sync::Lazy;
//!
//! #[derive(Default)]
//! struct Settings {
//!     greeting: String,
//!     accent: i64,
//!     title: String,
//! }
//!
//! impl Settings {
//!     fn set_title(&mut self, title: String) {
//!         self.title = title;
//!     }
//! }
//!
//! static SETTINGS: Lazy<Bindings<Settings>> = Lazy::new(|| {
//!     Bindings::builder()
//!         .field("greeting", BindingDeclaration::field_name(), |s: &mut Settings, v| s.greeting = v)
//!         .field(
//!             "accent",
//!             BindingDeclaration::new("theme.accent").indirect().kind(Kind::Color),
//!             |s: &mut Settings, v| s.accent = v,
//!         )
//!         .method("set_title", BindingDeclaration::new("app.title"), Settings::set_title)
//!         .build()
//!         .expect("valid bindings")
//! });
//!
//! impl MetadataBound for Settings {
//!     fn bindings() -> &'static Bindings<Self> {
//!         &SETTINGS
//!     }
//! }
//! ```
//!
//! Data flow:
//! ```text
//! Bindings<T> (fields, then methods)
//!        ↓
//! Decoder::resolve (lookup → indirect → class load)
//!        ↓
//! FromValue coercion → setter(&mut T, value)
//! ```

mod binder;
mod declaration;

// Re-export public types
pub use binder::{BindReport, Binding, Bindings, BindingsBuilder, MetadataBound};
pub use declaration::{BindingDeclaration, MemberKind};
