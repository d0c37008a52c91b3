//! Core trait definition for prediction combiners.

use tally_traits::{PredictionBatch, PredictionValue, Result};

/// Combines the predictions of several models into one consensus prediction.
///
/// Implementors are stateless with respect to the batches they see, so one
/// combiner may serve many rows concurrently (`Send + Sync`).
///
/// # Examples
///
/// ```rust,no_run
/// use tally_combine::Combiner;
/// use tally_traits::{PredictionBatch, PredictionValue, TallyError};
///
/// struct FirstSeen;
///
/// impl Combiner for FirstSeen {
///     fn combine(&self, batch: &PredictionBatch) -> tally_traits::Result<PredictionValue> {
///         batch
///             .iter()
///             .next()
///             .map(|bucket| bucket.value.clone())
///             .ok_or_else(|| TallyError::InvalidInput("empty batch".to_string()))
///     }
///
///     fn name(&self) -> &str {
///         "first_seen"
///     }
/// }
/// ```
pub trait Combiner: Send + Sync {
    /// Combine a batch of per-predictor outputs into a single prediction.
    ///
    /// # Arguments
    ///
    /// * `batch` - Predictions for one input row, grouped by predicted value.
    ///
    /// # Returns
    ///
    /// The winning label for classification batches, or the blended number
    /// (possibly `NaN`) for regression batches.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The batch is empty or mixes numbers and labels
    /// - A candidate has no usable weights
    /// - Probability weighting is requested without class distributions
    fn combine(&self, batch: &PredictionBatch) -> Result<PredictionValue>;

    /// Name of this combination strategy.
    ///
    /// Used for logging and for labelling CLI output.
    fn name(&self) -> &str;
}
