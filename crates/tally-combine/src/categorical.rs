//! Classification combiners: plurality and weight-sum voting.

use tally_traits::{
    CandidateScore, PredictionBatch, PredictionRecord, PredictionValue, Result, TallyError,
};

/// How a candidate's records turn into its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// One point per record.
    Count,
    /// Sum of the records' confidences; records without one are dropped.
    ConfidenceSum,
}

impl Vote {
    fn score(self, records: &[PredictionRecord]) -> Option<f64> {
        match self {
            Self::Count => (!records.is_empty()).then(|| records.len() as f64),
            Self::ConfidenceSum => {
                let confidences = extract_confidence(records);
                (!confidences.is_empty()).then(|| confidences.iter().sum())
            }
        }
    }
}

/// Confidences of `records`, skipping records that carry none.
pub fn extract_confidence(records: &[PredictionRecord]) -> Vec<f64> {
    records.iter().filter_map(|record| record.confidence).collect()
}

/// Score every candidate, in bucket order.
///
/// # Errors
///
/// Returns [`TallyError::InsufficientData`] if a candidate is left with no
/// scoring inputs, e.g. confidence voting where none of its records carries a
/// confidence.
pub fn score_candidates(batch: &PredictionBatch, vote: Vote) -> Result<Vec<CandidateScore>> {
    batch
        .iter()
        .map(|bucket| -> Result<CandidateScore> {
            let score = vote.score(&bucket.records).ok_or_else(|| {
                TallyError::InsufficientData(format!(
                    "no usable weights for candidate '{}'",
                    bucket.value
                ))
            })?;

            let tie_rank = bucket
                .records
                .iter()
                .map(|record| record.rank)
                .min()
                .unwrap_or(usize::MAX);

            Ok(CandidateScore {
                value: bucket.value.clone(),
                score,
                tie_rank,
            })
        })
        .collect()
}

/// Order candidates best first: higher score wins, equal scores go to the
/// smaller `tie_rank`.
pub fn rank_candidates(mut scores: Vec<CandidateScore>) -> Vec<CandidateScore> {
    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.tie_rank.cmp(&b.tie_rank))
    });
    scores
}

/// Pick the winning candidate value of a categorical batch.
///
/// # Errors
///
/// Returns [`TallyError::InvalidInput`] for an empty batch and propagates
/// errors from [`score_candidates`].
pub fn combine_categorical(batch: &PredictionBatch, vote: Vote) -> Result<PredictionValue> {
    rank_candidates(score_candidates(batch, vote)?)
        .into_iter()
        .next()
        .map(|winner| winner.value)
        .ok_or_else(|| TallyError::InvalidInput("cannot combine an empty batch".to_string()))
}
