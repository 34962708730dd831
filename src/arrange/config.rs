//! Per-call configuration for alignment and distribution

use std::fmt;
use std::str::FromStr;

use super::error::ParseModeError;

/// What alignment targets are computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorMode {
    /// The active node's bounds; the active node itself does not move
    Active,
    /// The bounds enclosing the whole selection
    #[default]
    Selection,
    /// The document canvas
    Canvas,
}

impl AnchorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorMode::Active => "active",
            AnchorMode::Selection => "selected",
            AnchorMode::Canvas => "canvas",
        }
    }
}

impl fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AnchorMode::Active),
            "selected" | "selection" => Ok(AnchorMode::Selection),
            "canvas" => Ok(AnchorMode::Canvas),
            other => Err(ParseModeError {
                what: "anchor",
                value: other.to_string(),
                expected: "active, selected, canvas",
            }),
        }
    }
}

/// Configuration options for one alignment or distribution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrangeConfig {
    /// Anchor used by alignment
    pub anchor: AnchorMode,

    /// Literal spacing between nodes for gap distribution; computed from
    /// the current arrangement when `None`
    pub spacing: Option<i32>,

    /// Keep the last node in place instead of the first when packing with
    /// a literal spacing
    pub reverse: bool,
}

impl ArrangeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alignment anchor
    pub fn with_anchor(mut self, anchor: AnchorMode) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set a literal distribution spacing
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Pack from the last node backwards
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}
