#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the Tally vote combiner.
//!
//! This crate provides the data handed from predictors to a combiner: one
//! [`PredictionRecord`] per ensemble member, grouped by predicted value into a
//! [`PredictionBatch`].

/// The version of the tally-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod batch;
pub mod error;
pub mod types;

// Re-exports
pub use batch::{Bucket, PredictionBatch, ValueKey};
pub use error::{Result, TallyError};
pub use types::{CandidateScore, ClassCount, PredictionRecord, PredictionValue, ValueDomain};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
