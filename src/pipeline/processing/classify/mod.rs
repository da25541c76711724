//! Brand and category classification against the lexicon snapshot.

pub mod brand;
pub mod category;

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_LABEL;

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Alias found verbatim in the title
    Exact,
    /// Token similarity above the configured threshold
    Fuzzy,
    /// Category keyword rule
    KeywordRule,
    /// No match; label is "unknown"
    None,
}

/// Result of one classifier pass. "No match" is a valid terminal state,
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f64,
    pub method: MatchMethod,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            confidence: 0.0,
            method: MatchMethod::None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }
}
