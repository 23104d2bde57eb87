//! Binding declarations

use std::fmt;

use crate::kind::Kind;

/// Whether a binding targets a field or a single-parameter setter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => f.write_str("field"),
            MemberKind::Method => f.write_str("method"),
        }
    }
}

/// How one member is populated from metadata
///
/// An empty key on a field binding means "use the field's name". Method
/// bindings have no such fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingDeclaration {
    key: String,
    indirect: bool,
    kind: Kind,
}

impl BindingDeclaration {
    /// Bind to an explicit metadata key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Bind a field to the key equal to its own name
    pub fn field_name() -> Self {
        Self::default()
    }

    /// The stored value is a resource handle, not the value itself
    pub fn indirect(mut self) -> Self {
        self.indirect = true;
        self
    }

    /// Resolve the handle as `kind` instead of inferring from the member type
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Declared key, possibly empty
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_indirect(&self) -> bool {
        self.indirect
    }

    pub fn kind_hint(&self) -> Kind {
        self.kind
    }
}
