//! The five scored dimensions.

use serde::{Deserialize, Serialize};

/// One independently scored axis of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Correctness,
    Quality,
    Efficiency,
    Readability,
    EdgeCases,
}

impl Dimension {
    /// All dimensions in reporting order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Correctness,
        Dimension::Quality,
        Dimension::Efficiency,
        Dimension::Readability,
        Dimension::EdgeCases,
    ];

    /// Wire key used in feedback maps.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Correctness => "correctness",
            Self::Quality => "quality",
            Self::Efficiency => "efficiency",
            Self::Readability => "readability",
            Self::EdgeCases => "edge_cases",
        }
    }

    /// Get the display name for the dimension.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Correctness => "Correctness",
            Self::Quality => "Quality",
            Self::Efficiency => "Efficiency",
            Self::Readability => "Readability",
            Self::EdgeCases => "Edge Cases",
        }
    }

    /// Look a dimension up by its wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
