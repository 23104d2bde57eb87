//! Coercion registry - kind dispatch and kind inference
//!
//! Two questions are answered here:
//! - given a kind, which resolver method turns a handle into a value
//!   (`resolve_by_kind`), and
//! - given a member's declared type, which kind to use when the binding did
//!   not name one (`infer_kind`).
//!
//! The kind table is an explicit `Kind -> fn` map built once. A kind missing
//! from the table is only reported when something asks for it.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{MetabindError, Result};
use crate::kind::Kind;
use crate::resources::ResourceResolver;
use crate::value::{TargetType, Value};

/// Resolves a handle of one kind through the resource backend
pub type ResolverFn = fn(&dyn ResourceResolver, i32) -> Result<Value>;

/// Default `Kind -> ResolverFn` table
const DEFAULT_TABLE: [(Kind, ResolverFn); 11] = [
    (Kind::String, |r, h| r.string(h).map(Value::String)),
    (Kind::Integer, |r, h| r.integer(h).map(Value::Integer)),
    (Kind::Boolean, |r, h| r.boolean(h).map(Value::Boolean)),
    (Kind::Dimension, |r, h| r.dimension(h).map(Value::Float)),
    (Kind::DimensionPixelOffset, |r, h| {
        r.dimension_pixel_offset(h).map(Value::Integer)
    }),
    (Kind::DimensionPixelSize, |r, h| {
        r.dimension_pixel_size(h).map(Value::Integer)
    }),
    (Kind::Color, |r, h| r.color(h).map(Value::Integer)),
    (Kind::Drawable, |r, h| r.drawable(h).map(Value::Opaque)),
    (Kind::Animation, |r, h| r.animation(h).map(Value::Opaque)),
    (Kind::IntArray, |r, h| r.int_array(h).map(Value::IntArray)),
    (Kind::Id, |r, h| r.integer(h).map(Value::Integer)),
];

/// Shared registry built from the default table
static DEFAULT_REGISTRY: Lazy<CoercionRegistry> =
    Lazy::new(|| CoercionRegistry::from_table(DEFAULT_TABLE));

/// Inference ladder, checked in order; the first matching rung wins
const INFERENCE_LADDER: [(fn(TargetType) -> bool, Kind); 6] = [
    (|t| matches!(t, TargetType::String | TargetType::Any), Kind::String),
    (|t| t == TargetType::Integer, Kind::Integer),
    (|t| t == TargetType::Boolean, Kind::Boolean),
    (|t| t == TargetType::Float, Kind::Dimension),
    (|t| t == TargetType::IntArray, Kind::IntArray),
    (|t| t == TargetType::Animation, Kind::Animation),
];

/// Maps kinds to resolver functions and declared types to kinds
#[derive(Clone)]
pub struct CoercionRegistry {
    table: FxHashMap<Kind, ResolverFn>,
}

impl std::fmt::Debug for CoercionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

impl CoercionRegistry {
    /// The process-wide registry with every concrete kind installed
    pub fn standard() -> &'static CoercionRegistry {
        &DEFAULT_REGISTRY
    }

    /// Build from an explicit table
    ///
    /// Kinds absent from `entries` are logged and stay unusable; `Auto`
    /// entries are ignored.
    pub fn from_table(entries: impl IntoIterator<Item = (Kind, ResolverFn)>) -> Self {
        let mut table = FxHashMap::default();
        for (kind, f) in entries {
            if kind.is_auto() {
                warn!("ignoring resolver registered for the auto pseudo-kind");
                continue;
            }
            table.insert(kind, f);
        }

        for kind in Kind::CONCRETE {
            if !table.contains_key(&kind) {
                warn!(%kind, "no resolver registered; bindings of this kind will fail");
            }
        }

        Self { table }
    }

    /// Start from the default table and override or remove entries
    pub fn builder() -> CoercionRegistryBuilder {
        CoercionRegistryBuilder {
            entries: DEFAULT_TABLE.iter().copied().collect(),
        }
    }

    /// Resolver function bound to `kind`
    pub fn resolve_by_kind(&self, kind: Kind) -> Result<ResolverFn> {
        self.table
            .get(&kind)
            .copied()
            .ok_or(MetabindError::UnsupportedKind { kind })
    }

    /// Most specific kind for a member of type `target`, if any
    pub fn infer_kind(&self, target: TargetType) -> Option<Kind> {
        INFERENCE_LADDER
            .iter()
            .find(|(matches, _)| matches(target))
            .map(|(_, kind)| *kind)
    }

    pub fn supports(&self, kind: Kind) -> bool {
        self.table.contains_key(&kind)
    }
}

impl Default for CoercionRegistry {
    fn default() -> Self {
        DEFAULT_REGISTRY.clone()
    }
}

/// Builder for a customised [`CoercionRegistry`]
pub struct CoercionRegistryBuilder {
    entries: FxHashMap<Kind, ResolverFn>,
}

impl CoercionRegistryBuilder {
    /// Install or replace the resolver for `kind`
    pub fn with(mut self, kind: Kind, f: ResolverFn) -> Self {
        self.entries.insert(kind, f);
        self
    }

    /// Remove the resolver for `kind`
    pub fn without(mut self, kind: Kind) -> Self {
        self.entries.remove(&kind);
        self
    }

    pub fn build(self) -> CoercionRegistry {
        CoercionRegistry::from_table(self.entries)
    }
}
