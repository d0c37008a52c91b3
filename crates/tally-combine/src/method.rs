//! Combination policy tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// The closed set of combination policies.
///
/// Unknown names never fail to parse: they fall back to [`Self::Plurality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CombinationMethod {
    /// One vote per predictor; plain average for regression.
    #[default]
    Plurality,
    /// Sum of confidences; error-weighted average for regression.
    ConfidenceWeighted,
    /// Sum of leaf class probabilities; plain average for regression.
    ProbabilityWeighted,
}

impl CombinationMethod {
    /// Every policy, in code order.
    pub const ALL: [Self; 3] = [
        Self::Plurality,
        Self::ConfidenceWeighted,
        Self::ProbabilityWeighted,
    ];

    /// Canonical policy name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plurality => "plurality",
            Self::ConfidenceWeighted => "confidence weighted",
            Self::ProbabilityWeighted => "probability weighted",
        }
    }

    /// Numeric code accepted by [`Self::from_name`].
    pub const fn code(&self) -> u8 {
        match self {
            Self::Plurality => 0,
            Self::ConfidenceWeighted => 1,
            Self::ProbabilityWeighted => 2,
        }
    }

    /// One-line description for listings.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Plurality => "one vote per predictor (regression: plain average)",
            Self::ConfidenceWeighted => {
                "sum of confidences (regression: exponentially error-weighted average)"
            }
            Self::ProbabilityWeighted => {
                "sum of leaf class probabilities (regression: plain average)"
            }
        }
    }

    /// Parse a policy name leniently.
    ///
    /// Matching ignores case and surrounding whitespace, and treats `_` and `-`
    /// as spaces. The numeric codes `0`, `1` and `2` are accepted too. Anything
    /// else logs a warning and yields [`Self::Plurality`].
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "plurality" | "0" => Self::Plurality,
            "confidence weighted" | "confidence" | "1" => Self::ConfidenceWeighted,
            "probability weighted" | "probability" | "2" => Self::ProbabilityWeighted,
            _ => {
                warn!(method = name, "unknown combination method, using plurality");
                Self::Plurality
            }
        }
    }
}

impl fmt::Display for CombinationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for CombinationMethod {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<CombinationMethod> for String {
    fn from(method: CombinationMethod) -> Self {
        method.name().to_string()
    }
}
