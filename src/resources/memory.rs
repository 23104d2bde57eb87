//! In-memory resource table
//!
//! Serves resources from a handle-keyed map. Records every lookup so callers
//! can assert which kinds the decoder asked for.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::ResourceResolver;
use crate::error::{MetabindError, Result};
use crate::kind::Kind;
use crate::value::OpaqueHandle;

/// A single stored resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    String(String),
    Integer(i64),
    Boolean(bool),
    Color(i64),
    Dimension(f64),
    Drawable(OpaqueHandle),
    Animation(OpaqueHandle),
    IntArray(Vec<i64>),
}

/// Resource backend backed by a map from handle to resource
#[derive(Debug, Default)]
pub struct InMemoryResources {
    entries: FxHashMap<i32, Resource>,
    /// Every `(handle, kind)` lookup, in call order
    calls: Mutex<Vec<(i32, Kind)>>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn with(mut self, handle: i32, resource: Resource) -> Self {
        self.entries.insert(handle, resource);
        self
    }

    pub fn with_string(self, handle: i32, value: impl Into<String>) -> Self {
        self.with(handle, Resource::String(value.into()))
    }

    pub fn with_integer(self, handle: i32, value: i64) -> Self {
        self.with(handle, Resource::Integer(value))
    }

    pub fn with_boolean(self, handle: i32, value: bool) -> Self {
        self.with(handle, Resource::Boolean(value))
    }

    pub fn with_color(self, handle: i32, argb: i64) -> Self {
        self.with(handle, Resource::Color(argb))
    }

    pub fn with_dimension(self, handle: i32, value: f64) -> Self {
        self.with(handle, Resource::Dimension(value))
    }

    pub fn with_drawable(self, handle: i32, drawable: OpaqueHandle) -> Self {
        self.with(handle, Resource::Drawable(drawable))
    }

    pub fn with_animation(self, handle: i32, animation: OpaqueHandle) -> Self {
        self.with(handle, Resource::Animation(animation))
    }

    pub fn with_int_array(self, handle: i32, values: Vec<i64>) -> Self {
        self.with(handle, Resource::IntArray(values))
    }

    /// All lookups made so far
    pub fn calls(&self) -> Vec<(i32, Kind)> {
        self.calls.lock().clone()
    }

    /// Kinds requested for `handle`, in call order
    pub fn kinds_requested(&self, handle: i32) -> Vec<Kind> {
        self.calls
            .lock()
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, k)| *k)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Record the lookup and fetch the entry
    fn lookup(&self, handle: i32, kind: Kind) -> Result<&Resource> {
        self.calls.lock().push((handle, kind));
        self.entries
            .get(&handle)
            .ok_or(MetabindError::ResourceNotFound { handle, kind })
    }
}

impl ResourceResolver for InMemoryResources {
    fn string(&self, handle: i32) -> Result<String> {
        match self.lookup(handle, Kind::String)? {
            Resource::String(s) => Ok(s.clone()),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::String }),
        }
    }

    fn integer(&self, handle: i32) -> Result<i64> {
        // Colors are stored as integers too
        match self.lookup(handle, Kind::Integer)? {
            Resource::Integer(i) | Resource::Color(i) => Ok(*i),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::Integer }),
        }
    }

    fn boolean(&self, handle: i32) -> Result<bool> {
        match self.lookup(handle, Kind::Boolean)? {
            Resource::Boolean(b) => Ok(*b),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::Boolean }),
        }
    }

    fn color(&self, handle: i32) -> Result<i64> {
        match self.lookup(handle, Kind::Color)? {
            Resource::Color(c) => Ok(*c),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::Color }),
        }
    }

    fn dimension(&self, handle: i32) -> Result<f64> {
        match self.lookup(handle, Kind::Dimension)? {
            Resource::Dimension(d) => Ok(*d),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::Dimension }),
        }
    }

    fn dimension_pixel_offset(&self, handle: i32) -> Result<i64> {
        let kind = Kind::DimensionPixelOffset;
        match self.lookup(handle, kind)? {
            Resource::Dimension(d) => Ok(d.trunc() as i64),
            _ => Err(MetabindError::ResourceNotFound { handle, kind }),
        }
    }

    fn dimension_pixel_size(&self, handle: i32) -> Result<i64> {
        let kind = Kind::DimensionPixelSize;
        match self.lookup(handle, kind)? {
            Resource::Dimension(d) => {
                let px = d.round() as i64;
                if px == 0 && *d != 0.0 {
                    Ok(if *d > 0.0 { 1 } else { -1 })
                } else {
                    Ok(px)
                }
            }
            _ => Err(MetabindError::ResourceNotFound { handle, kind }),
        }
    }

    fn drawable(&self, handle: i32) -> Result<OpaqueHandle> {
        match self.lookup(handle, Kind::Drawable)? {
            Resource::Drawable(h) => Ok(h.clone()),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::Drawable }),
        }
    }

    fn animation(&self, handle: i32) -> Result<OpaqueHandle> {
        match self.lookup(handle, Kind::Animation)? {
            Resource::Animation(h) => Ok(h.clone()),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::Animation }),
        }
    }

    fn int_array(&self, handle: i32) -> Result<Vec<i64>> {
        match self.lookup(handle, Kind::IntArray)? {
            Resource::IntArray(v) => Ok(v.clone()),
            _ => Err(MetabindError::ResourceNotFound { handle, kind: Kind::IntArray }),
        }
    }
}
