//! Error types for the Tally workspace.
//!
//! Every failure is scoped to the single prediction row being combined: the
//! combiner never retries or substitutes defaults, the caller decides whether
//! to skip the row, fall back to another method, or abort.

use thiserror::Error;

/// The main error type for Tally operations.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Empty batch, mixed numeric and categorical values, or a record whose
    /// class distribution is inconsistent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A candidate has no usable scoring inputs after weight extraction.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Probability weighting was requested but a record carries no class
    /// distribution or instance total.
    #[error("Missing distribution: {0}")]
    MissingDistribution(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for TallyError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TallyError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Tally operations.
///
/// This is a convenience type that uses [`TallyError`] as the error type.
pub type Result<T> = std::result::Result<T, TallyError>;
