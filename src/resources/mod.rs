//! # Resource Resolution
//!
//! Contract for the backend that turns a resource handle into a value.
//!
//! ## Overview
//!
//! Indirect bindings store an integer handle in the manifest instead of the
//! value itself. The decoder picks a [`Kind`] for the handle (explicit hint or
//! inference) and the coercion registry routes it to one method of
//! [`ResourceResolver`]:
//!
//! | Kind | Method | Value |
//! |------|--------|-------|
//! | `string` | `string` | `Value::String` |
//! | `integer`, `id` | `integer` | `Value::Integer` |
//! | `boolean` | `boolean` | `Value::Boolean` |
//! | `color` | `color` | `Value::Integer` (ARGB) |
//! | `dimension` | `dimension` | `Value::Float` |
//! | `dimensionPixelOffset` | `dimension_pixel_offset` | `Value::Integer` |
//! | `dimensionPixelSize` | `dimension_pixel_size` | `Value::Integer` |
//! | `drawable` | `drawable` | `Value::Opaque` |
//! | `animation` | `animation` | `Value::Opaque` |
//! | `intArray` | `int_array` | `Value::IntArray` |
//!
//! Every method has a default body returning `UnsupportedKind`, so a backend
//! only implements the kinds it serves.
//!
//! ```rust
//! use metabind::resources::{InMemoryResources, ResourceResolver};
//!
//! let resources = InMemoryResources::new().with_string(0x7f0a_0001, "Hello, World!");
//! assert_eq!(resources.string(0x7f0a_0001).unwrap(), "Hello, World!");
//! assert!(resources.color(0x7f0a_0001).is_err());
//! ```

mod memory;

pub use memory::{InMemoryResources, Resource};

use crate::error::{MetabindError, Result};
use crate::kind::Kind;
use crate::value::OpaqueHandle;

/// Backend translating `(handle, kind)` into a concrete value
pub trait ResourceResolver: Send + Sync {
    fn string(&self, handle: i32) -> Result<String> {
        unsupported(handle, Kind::String)
    }

    fn integer(&self, handle: i32) -> Result<i64> {
        unsupported(handle, Kind::Integer)
    }

    fn boolean(&self, handle: i32) -> Result<bool> {
        unsupported(handle, Kind::Boolean)
    }

    /// Packed ARGB color
    fn color(&self, handle: i32) -> Result<i64> {
        unsupported(handle, Kind::Color)
    }

    fn dimension(&self, handle: i32) -> Result<f64> {
        unsupported(handle, Kind::Dimension)
    }

    /// Dimension truncated to whole pixels
    fn dimension_pixel_offset(&self, handle: i32) -> Result<i64> {
        unsupported(handle, Kind::DimensionPixelOffset)
    }

    /// Dimension rounded to whole pixels, never zero for a non-zero size
    fn dimension_pixel_size(&self, handle: i32) -> Result<i64> {
        unsupported(handle, Kind::DimensionPixelSize)
    }

    fn drawable(&self, handle: i32) -> Result<OpaqueHandle> {
        unsupported(handle, Kind::Drawable)
    }

    fn animation(&self, handle: i32) -> Result<OpaqueHandle> {
        unsupported(handle, Kind::Animation)
    }

    fn int_array(&self, handle: i32) -> Result<Vec<i64>> {
        unsupported(handle, Kind::IntArray)
    }
}

fn unsupported<T>(_handle: i32, kind: Kind) -> Result<T> {
    Err(MetabindError::UnsupportedKind { kind })
}
