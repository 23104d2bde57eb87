//! Resource kinds
//!
//! Closed set of resource categories an indirect binding can resolve to.
//! `Auto` is a hint only: it asks the coercion registry to infer the kind
//! from the member's declared type and never appears as a resolution outcome.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resource category used to select a resolution function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    String,
    Integer,
    Boolean,
    Dimension,
    DimensionPixelOffset,
    DimensionPixelSize,
    Color,
    Drawable,
    Animation,
    IntArray,
    Id,
    #[default]
    Auto,
}

impl Kind {
    /// Every concrete kind, in table order (excludes `Auto`)
    pub const CONCRETE: [Kind; 11] = [
        Kind::String,
        Kind::Integer,
        Kind::Boolean,
        Kind::Dimension,
        Kind::DimensionPixelOffset,
        Kind::DimensionPixelSize,
        Kind::Color,
        Kind::Drawable,
        Kind::Animation,
        Kind::IntArray,
        Kind::Id,
    ];

    pub fn is_auto(self) -> bool {
        self == Kind::Auto
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Dimension => "dimension",
            Kind::DimensionPixelOffset => "dimensionPixelOffset",
            Kind::DimensionPixelSize => "dimensionPixelSize",
            Kind::Color => "color",
            Kind::Drawable => "drawable",
            Kind::Animation => "animation",
            Kind::IntArray => "intArray",
            Kind::Id => "id",
            Kind::Auto => "auto",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(Kind::Auto)
            .chain(Kind::CONCRETE)
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resource kind '{}'", s))
    }
}
