#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Vote and weight aggregation for ensemble predictions.
//!
//! This crate turns the outputs of several predictors for one input row into a
//! single consensus: the winning label for classification, or a blended number
//! for regression. Three policies are available (plurality, confidence
//! weighted, probability weighted), dispatched by [`VoteCombiner`] according to
//! whether the batch holds numbers or labels.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tally_combine::{CombinationMethod, combine};
//! use tally_traits::{PredictionBatch, PredictionRecord};
//!
//! let batch = PredictionBatch::from_records(vec![
//!     PredictionRecord::number(1.0, 0),
//!     PredictionRecord::number(1.0, 1),
//!     PredictionRecord::number(2.0, 2),
//! ])
//! .unwrap();
//!
//! let blended = combine(&batch, CombinationMethod::Plurality).unwrap();
//! ```

mod categorical;
mod combiner;
mod confidence;
mod method;
mod numeric;
mod probability;
mod vote;

// Re-export main types
pub use categorical::{Vote, combine_categorical, extract_confidence, rank_candidates, score_candidates};
pub use combiner::Combiner;
pub use confidence::{DEFAULT_Z, wilson_score};
pub use method::CombinationMethod;
pub use numeric::{
    DEFAULT_TOP_RANGE, ErrorWeights, NumericSummary, average, error_weighted_average,
    normalize_errors, numeric_summary,
};
pub use probability::probability_weight;
pub use vote::{Consensus, VoteCombiner, VoteConfig, combine};
