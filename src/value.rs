//! Dynamic values and coercion into member types
//!
//! `Value` is what the metadata store holds and what resource resolution
//! produces. `FromValue` is the last step of the pipeline: it names the
//! member's declared `TargetType` (consumed by kind inference) and performs
//! the assignment-time conversion.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::classes::TypeHandle;
use crate::error::{MetabindError, Result};
use crate::kind::Kind;

// ============================================================================
// VALUE
// ============================================================================

/// Raw or resolved metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    Float(f64),
    IntArray(Vec<i64>),
    /// Resource object with no scalar representation (drawables, animations)
    Opaque(OpaqueHandle),
    /// Loaded class-identifier
    Type(TypeHandle),
}

impl Value {
    /// Short type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Float(_) => "float",
            Value::IntArray(_) => "int array",
            Value::Opaque(_) => "opaque handle",
            Value::Type(_) => "type handle",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Interpret as a resource handle (integer that fits in 32 bits)
    pub fn as_handle(&self) -> Option<i32> {
        self.as_i64().and_then(|i| i32::try_from(i).ok())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::IntArray(v)
    }
}

impl From<OpaqueHandle> for Value {
    fn from(h: OpaqueHandle) -> Self {
        Value::Opaque(h)
    }
}

impl From<TypeHandle> for Value {
    fn from(t: TypeHandle) -> Self {
        Value::Type(t)
    }
}

// ============================================================================
// OPAQUE HANDLES
// ============================================================================

/// Shared handle to a resource object the decoder never inspects
///
/// Equality is identity: two handles are equal when they point at the same
/// allocation and carry the same kind.
#[derive(Clone)]
pub struct OpaqueHandle {
    kind: Kind,
    inner: Arc<dyn Any + Send + Sync>,
}

impl OpaqueHandle {
    pub fn new<T: Any + Send + Sync>(kind: Kind, value: T) -> Self {
        Self {
            kind,
            inner: Arc::new(value),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for OpaqueHandle {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueHandle").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Opaque animation resource
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationHandle(pub OpaqueHandle);

/// Opaque drawable resource
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableHandle(pub OpaqueHandle);

// ============================================================================
// TARGET TYPES
// ============================================================================

/// Declared type of a bound member, as seen by kind inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    String,
    Integer,
    Boolean,
    Float,
    IntArray,
    Animation,
    Drawable,
    /// Opaque resource object of unspecified kind; never inferred
    Opaque,
    /// Class identifier: the resolved string is loaded through the class loader
    ClassId,
    /// Accepts any value
    Any,
}

// ============================================================================
// COERCION
// ============================================================================

/// Conversion from a resolved `Value` into a member's Rust type
///
/// On mismatch the value is handed back so the caller can report what it
/// found.
pub trait FromValue: Sized {
    const TARGET: TargetType;
    const TYPE_NAME: &'static str;

    fn from_value(value: Value) -> std::result::Result<Self, Value>;
}

/// Convert `value` for the member bound to `key`
pub fn coerce<T: FromValue>(key: &str, value: Value) -> Result<T> {
    T::from_value(value).map_err(|v| MetabindError::IncompatibleValue {
        key: key.to_string(),
        target: T::TYPE_NAME,
        found: v.type_name(),
    })
}

impl FromValue for Value {
    const TARGET: TargetType = TargetType::Any;
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for String {
    const TARGET: TargetType = TargetType::String;
    const TYPE_NAME: &'static str = "String";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for i64 {
    const TARGET: TargetType = TargetType::Integer;
    const TYPE_NAME: &'static str = "i64";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FromValue for i32 {
    const TARGET: TargetType = TargetType::Integer;
    const TYPE_NAME: &'static str = "i32";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Integer(i) => i32::try_from(i).map_err(|_| Value::Integer(i)),
            other => Err(other),
        }
    }
}

impl FromValue for u32 {
    const TARGET: TargetType = TargetType::Integer;
    const TYPE_NAME: &'static str = "u32";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            // Colors are packed ARGB and commonly exceed i32::MAX when read as u32
            Value::Integer(i) if (i32::MIN as i64..0).contains(&i) => Ok(i as i32 as u32),
            Value::Integer(i) => u32::try_from(i).map_err(|_| Value::Integer(i)),
            other => Err(other),
        }
    }
}

impl FromValue for bool {
    const TARGET: TargetType = TargetType::Boolean;
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromValue for f64 {
    const TARGET: TargetType = TargetType::Float;
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            other => Err(other),
        }
    }
}

impl FromValue for f32 {
    const TARGET: TargetType = TargetType::Float;
    const TYPE_NAME: &'static str = "f32";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for Vec<i64> {
    const TARGET: TargetType = TargetType::IntArray;
    const TYPE_NAME: &'static str = "Vec<i64>";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::IntArray(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FromValue for Vec<i32> {
    const TARGET: TargetType = TargetType::IntArray;
    const TYPE_NAME: &'static str = "Vec<i32>";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::IntArray(v) => {
                let narrowed: Option<Vec<i32>> =
                    v.iter().map(|&i| i32::try_from(i).ok()).collect();
                narrowed.ok_or(Value::IntArray(v))
            }
            other => Err(other),
        }
    }
}

impl FromValue for OpaqueHandle {
    const TARGET: TargetType = TargetType::Opaque;
    const TYPE_NAME: &'static str = "OpaqueHandle";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Opaque(h) => Ok(h),
            other => Err(other),
        }
    }
}

impl FromValue for AnimationHandle {
    const TARGET: TargetType = TargetType::Animation;
    const TYPE_NAME: &'static str = "AnimationHandle";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Opaque(h) if h.kind() == Kind::Animation => Ok(AnimationHandle(h)),
            other => Err(other),
        }
    }
}

impl FromValue for DrawableHandle {
    const TARGET: TargetType = TargetType::Drawable;
    const TYPE_NAME: &'static str = "DrawableHandle";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Opaque(h) if h.kind() == Kind::Drawable => Ok(DrawableHandle(h)),
            other => Err(other),
        }
    }
}

impl FromValue for TypeHandle {
    const TARGET: TargetType = TargetType::ClassId;
    const TYPE_NAME: &'static str = "TypeHandle";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Type(t) => Ok(t),
            other => Err(other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TARGET: TargetType = T::TARGET;
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        T::from_value(value).map(Some)
    }
}
