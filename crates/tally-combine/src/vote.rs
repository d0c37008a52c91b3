//! Policy dispatch: route a batch to the numeric or categorical combiners.

use serde::{Deserialize, Serialize};
use tally_traits::{
    CandidateScore, PredictionBatch, PredictionValue, Result, TallyError, ValueDomain,
};
use tracing::debug;

use crate::categorical::{Vote, rank_candidates, score_candidates};
use crate::combiner::Combiner;
use crate::confidence::{DEFAULT_Z, wilson_score};
use crate::method::CombinationMethod;
use crate::numeric::{DEFAULT_TOP_RANGE, average, error_weighted_average};
use crate::probability::probability_weight;

/// Configuration for vote combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteConfig {
    /// Combination policy
    pub method: CombinationMethod,

    /// Exponent spread between the best and worst regression error weight
    pub top_range: f64,

    /// z-score of the Wilson interval used for combined classification confidence
    pub confidence_z: f64,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            method: CombinationMethod::Plurality,
            top_range: DEFAULT_TOP_RANGE,
            confidence_z: DEFAULT_Z,
        }
    }
}

/// A combined prediction together with its estimated confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consensus {
    /// Winning label or blended number.
    pub prediction: PredictionValue,
    /// Wilson lower bound of the winner's share for classification, mean error
    /// for regression; `None` when no regression record carries an error.
    pub confidence: Option<f64>,
}

/// Combiner that detects the value domain of a batch and applies the configured
/// policy.
///
/// | method               | numeric                    | categorical                      |
/// |----------------------|----------------------------|----------------------------------|
/// | plurality            | [`average`]                | record count                     |
/// | confidence weighted  | [`error_weighted_average`] | confidence sum                   |
/// | probability weighted | [`average`]                | confidence sum over leaf classes |
///
/// # Examples
///
/// ```rust,no_run
/// use tally_combine::{CombinationMethod, Combiner, VoteCombiner};
/// use tally_traits::{PredictionBatch, PredictionRecord, PredictionValue};
///
/// let batch = PredictionBatch::from_records(vec![
///     PredictionRecord::label("a", 0).with_confidence(0.26289),
///     PredictionRecord::label("a", 1).with_confidence(0.22343),
///     PredictionRecord::label("b", 2).with_confidence(0.1783),
/// ])
/// .unwrap();
///
/// let combiner = VoteCombiner::with_method(CombinationMethod::ConfidenceWeighted);
/// assert_eq!(combiner.combine(&batch).unwrap(), PredictionValue::from("a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VoteCombiner {
    config: VoteConfig,
}

impl VoteCombiner {
    /// Create a new vote combiner with the given configuration.
    pub const fn new(config: VoteConfig) -> Self {
        Self { config }
    }

    /// Create a combiner for `method` with default tuning.
    pub fn with_method(method: CombinationMethod) -> Self {
        Self::new(VoteConfig {
            method,
            ..VoteConfig::default()
        })
    }

    /// The active configuration.
    pub const fn config(&self) -> &VoteConfig {
        &self.config
    }

    /// Blend a numeric batch under the configured method.
    fn combine_numeric(&self, batch: &PredictionBatch) -> Result<f64> {
        match self.config.method {
            CombinationMethod::ConfidenceWeighted => {
                error_weighted_average(batch, self.config.top_range)
            }
            // Leaf distributions carry no meaning for regression targets.
            CombinationMethod::Plurality | CombinationMethod::ProbabilityWeighted => {
                Ok(average(batch))
            }
        }
    }

    /// Score a categorical batch under the configured method, unordered.
    fn score_categorical(&self, batch: &PredictionBatch) -> Result<Vec<CandidateScore>> {
        match self.config.method {
            CombinationMethod::Plurality => score_candidates(batch, Vote::Count),
            CombinationMethod::ConfidenceWeighted => score_candidates(batch, Vote::ConfidenceSum),
            CombinationMethod::ProbabilityWeighted => {
                score_candidates(&probability_weight(batch)?, Vote::ConfidenceSum)
            }
        }
    }

    /// Every candidate of a categorical batch, best first.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] for an empty, mixed or numeric
    /// batch, and propagates scoring errors.
    pub fn rank(&self, batch: &PredictionBatch) -> Result<Vec<CandidateScore>> {
        match batch.domain()? {
            ValueDomain::Categorical => Ok(rank_candidates(self.score_categorical(batch)?)),
            ValueDomain::Numeric => Err(TallyError::InvalidInput(
                "numeric predictions have no candidate ranking".to_string(),
            )),
        }
    }

    /// Combine a batch and estimate the confidence of the result.
    ///
    /// # Errors
    ///
    /// Same as [`Combiner::combine`].
    pub fn combine_with_confidence(&self, batch: &PredictionBatch) -> Result<Consensus> {
        let domain = batch.domain()?;
        debug!(%domain, method = %self.config.method, buckets = batch.len(), "combining predictions");

        match domain {
            ValueDomain::Numeric => {
                let errors: Vec<f64> = batch.records().filter_map(|r| r.confidence).collect();
                let confidence =
                    (!errors.is_empty()).then(|| errors.iter().sum::<f64>() / errors.len() as f64);

                let blended = self.combine_numeric(batch)?;
                debug!(blended, records = batch.record_count(), "blended prediction");

                Ok(Consensus {
                    prediction: PredictionValue::Number(blended),
                    confidence,
                })
            }
            ValueDomain::Categorical => {
                let ranked = rank_candidates(self.score_categorical(batch)?);
                let mass: f64 = ranked.iter().map(|c| c.score).sum();
                let winner = ranked.into_iter().next().ok_or_else(|| {
                    TallyError::InvalidInput("cannot combine an empty batch".to_string())
                })?;

                let confidence = if mass > 0.0 {
                    wilson_score(
                        winner.score / mass,
                        batch.record_count(),
                        self.config.confidence_z,
                    )
                } else {
                    0.0
                };

                debug!(winner = %winner.value, score = winner.score, confidence, "selected winner");
                Ok(Consensus {
                    prediction: winner.value,
                    confidence: Some(confidence),
                })
            }
        }
    }
}

impl Combiner for VoteCombiner {
    fn combine(&self, batch: &PredictionBatch) -> Result<PredictionValue> {
        self.combine_with_confidence(batch)
            .map(|consensus| consensus.prediction)
    }

    fn name(&self) -> &str {
        self.config.method.name()
    }
}

/// Combine `batch` under `method` with default tuning.
///
/// # Errors
///
/// See [`Combiner::combine`].
pub fn combine(batch: &PredictionBatch, method: CombinationMethod) -> Result<PredictionValue> {
    VoteCombiner::with_method(method).combine(batch)
}
