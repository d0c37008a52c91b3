//! Common types used throughout the Tally workspace.
//!
//! This module defines what a single predictor hands to the combiner and the
//! transient per-candidate aggregate produced while voting.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Result, TallyError};

/// One `(class, instance count)` pair of a leaf's class distribution.
///
/// Serialized as a two-element array, e.g. `["iris-setosa", 50]`.
pub type ClassCount = (String, u64);

/// A predicted value: a number for regression or a label for classification.
///
/// Deserialization is untagged, so JSON numbers become [`PredictionValue::Number`]
/// and JSON strings become [`PredictionValue::Label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(untagged)]
pub enum PredictionValue {
    /// Regression output.
    #[display("{_0}")]
    Number(f64),
    /// Classification output.
    #[display("{_0}")]
    Label(String),
}

impl PredictionValue {
    /// Returns `true` for regression values.
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns the numeric value, if any.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Label(_) => None,
        }
    }

    /// Returns the label, if any.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(l) => Some(l),
            Self::Number(_) => None,
        }
    }

    /// Key equality used for bucketing: unlike `==`, two `NaN` numbers match.
    pub fn same_key(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Label(a), Self::Label(b)) => a == b,
            _ => false,
        }
    }

    /// The value domain this value belongs to.
    pub const fn domain(&self) -> ValueDomain {
        match self {
            Self::Number(_) => ValueDomain::Numeric,
            Self::Label(_) => ValueDomain::Categorical,
        }
    }
}

impl From<f64> for PredictionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for PredictionValue {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}

impl From<String> for PredictionValue {
    fn from(s: String) -> Self {
        Self::Label(s)
    }
}

/// Whether a batch holds regression or classification predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValueDomain {
    /// Every predicted value is a number.
    #[display("numeric")]
    Numeric,
    /// Every predicted value is a label.
    #[display("categorical")]
    Categorical,
}

/// One predictor's output for one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// The predicted label or number.
    pub value: PredictionValue,

    /// Confidence in `[0, 1]` for classification, error magnitude for regression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Position of the predictor among the ensemble members. Only used to break
    /// score ties, never as a weight.
    pub rank: usize,

    /// Class distribution of the leaf that produced the prediction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<ClassCount>>,

    /// Training instances backing `distribution`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_instances: Option<u64>,
}

impl PredictionRecord {
    /// Create a record with no confidence or distribution attached.
    pub const fn new(value: PredictionValue, rank: usize) -> Self {
        Self {
            value,
            confidence: None,
            rank,
            distribution: None,
            total_instances: None,
        }
    }

    /// Create a regression record.
    pub const fn number(value: f64, rank: usize) -> Self {
        Self::new(PredictionValue::Number(value), rank)
    }

    /// Create a classification record.
    pub fn label(value: impl Into<String>, rank: usize) -> Self {
        Self::new(PredictionValue::Label(value.into()), rank)
    }

    /// Attach a confidence (or, for regression, an error) value.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach the producing leaf's class distribution and instance total.
    #[must_use]
    pub fn with_distribution<I, S>(mut self, distribution: I, total_instances: u64) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        self.distribution = Some(
            distribution
                .into_iter()
                .map(|(class, count)| (class.into(), count))
                .collect(),
        );
        self.total_instances = Some(total_instances);
        self
    }

    /// Check the distribution invariant: when a distribution is present the
    /// instance total must be positive and no smaller than the summed counts.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] when the invariant does not hold.
    pub fn validate(&self) -> Result<()> {
        let (Some(distribution), Some(total)) = (&self.distribution, self.total_instances) else {
            return Ok(());
        };

        if total == 0 {
            return Err(TallyError::InvalidInput(format!(
                "record at rank {} has a distribution but zero total instances",
                self.rank
            )));
        }

        let counted = distribution
            .iter()
            .try_fold(0u64, |acc, (_, count)| acc.checked_add(*count))
            .ok_or_else(|| {
                TallyError::InvalidInput(format!(
                    "record at rank {} has a class distribution that overflows its count",
                    self.rank
                ))
            })?;
        if counted > total {
            return Err(TallyError::InvalidInput(format!(
                "record at rank {} distributes {} instances but only has {}",
                self.rank, counted, total
            )));
        }

        Ok(())
    }
}

/// Accumulated vote for one candidate value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    /// The candidate being scored.
    pub value: PredictionValue,
    /// Vote count or confidence/probability mass.
    pub score: f64,
    /// Earliest predictor rank that contributed to this candidate.
    pub tie_rank: usize,
}
