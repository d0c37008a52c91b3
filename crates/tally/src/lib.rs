#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # tally
//!
//! tally is an umbrella crate that re-exports the tally sub-crates for
//! convenience.
//!
//! ## Crate Organization
//!
//! - [`traits`] - Prediction records, batches and errors
//! - [`combine`] - Combination policies and the [`VoteCombiner`] dispatcher
//!
//! ## Architecture
//!
//! 1. **Predictors** (tree evaluators, remote models) emit one
//!    [`PredictionRecord`] each per input row
//! 2. The caller groups them into a [`PredictionBatch`]
//! 3. A [`Combiner`] reduces the batch to a single [`PredictionValue`]

/// Version information for the tally crate.
///
/// This constant contains the current version of tally as specified in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Prediction records, batches and errors.
///
/// # Example
///
/// ```
/// use tally::traits::{PredictionBatch, PredictionRecord};
///
/// let batch = PredictionBatch::from_records(vec![PredictionRecord::number(2.0, 0)]).unwrap();
/// assert_eq!(batch.record_count(), 1);
/// ```
pub mod traits {
    pub use tally_traits::*;
}

// Re-export error types
pub use tally_traits::{Result, TallyError};

// Re-export common types
pub use tally_traits::{
    Bucket, CandidateScore, ClassCount, PredictionBatch, PredictionRecord, PredictionValue,
    ValueDomain, ValueKey,
};

// ============================================================================
// Combination
// ============================================================================

/// Combination policies.
///
/// ## Available Combiners
///
/// - **Plurality**: one vote per record, plain average for regression
/// - **Confidence weighted**: confidence mass, error-weighted average for regression
/// - **Probability weighted**: leaf class probability mass, plain average for regression
///
/// # Example
///
/// ```ignore
/// use tally::combine::{CombinationMethod, VoteCombiner, VoteConfig};
///
/// let combiner = VoteCombiner::new(VoteConfig {
///     method: CombinationMethod::ProbabilityWeighted,
///     ..VoteConfig::default()
/// });
/// ```
pub mod combine {
    pub use tally_combine::*;
}

// Re-export the dispatcher at top level for convenience
pub use tally_combine::{CombinationMethod, Combiner, Consensus, VoteCombiner, VoteConfig};

// ============================================================================
// Tests
// ============================================================================
