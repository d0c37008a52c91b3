//! Regression combiners: plain and error-weighted averages.
//!
//! Both combiners return `NaN` instead of failing when the total weight is
//! zero; callers rely on `NaN` to mean "no usable prediction".

use ndarray::Array1;
use serde::Serialize;
use tally_traits::{PredictionBatch, Result, TallyError};

/// Default spread between the best and worst predictor's weight, as an exponent.
pub const DEFAULT_TOP_RANGE: f64 = 10.0;

/// Error values rewritten into weights by [`normalize_errors`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorWeights {
    /// One weight list per input error list, same shape as the input.
    pub weights: Vec<Vec<f64>>,
    /// Sum of every weight, used as the normalization denominator.
    pub total: f64,
}

/// Descriptive statistics over every numeric prediction in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Number of records.
    pub count: usize,
    /// Smallest prediction.
    pub min: f64,
    /// Largest prediction.
    pub max: f64,
    /// Median prediction (mean of the middle pair for even counts).
    pub median: f64,
}

/// Every `(value, record)` pair of a numeric batch flattened to one value per
/// record. Label buckets are skipped.
fn expanded_values(batch: &PredictionBatch) -> Vec<f64> {
    batch
        .iter()
        .filter_map(|bucket| {
            bucket
                .value
                .as_number()
                .map(|value| std::iter::repeat_n(value, bucket.records.len()))
        })
        .flatten()
        .collect()
}

/// `Σ value·weight / total`, or `NaN` when `total` is zero.
fn weighted_mean(values: &Array1<f64>, weights: &Array1<f64>, total: f64) -> f64 {
    if total == 0.0 {
        return f64::NAN;
    }
    values.dot(weights) / total
}

/// Average every numeric prediction with unit weight per record.
///
/// Returns `NaN` for a batch with no records.
pub fn average(batch: &PredictionBatch) -> f64 {
    let values = Array1::from_vec(expanded_values(batch));
    let weights = Array1::<f64>::ones(values.len());
    weighted_mean(&values, &weights, weights.sum())
}

/// Rescale raw error magnitudes into exponential weights.
///
/// Errors from every list are pooled to find `min` and `max`. With a positive
/// range each error `e` becomes `exp((min - e) / range * top_range)`, so the
/// smallest error weighs `1` and the largest `exp(-top_range)`: the best
/// predictor outweighs the worst by a factor of `exp(top_range)`. When every
/// error is identical the raw values are kept as weights.
///
/// The input is left untouched; the weights come back in a new structure of the
/// same shape along with their sum.
pub fn normalize_errors(errors: &[Vec<f64>], top_range: f64) -> ErrorWeights {
    let (min_error, max_error) = errors
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
            (lo.min(e), hi.max(e))
        });
    let range = max_error - min_error;

    let weights: Vec<Vec<f64>> = if range > 0.0 {
        errors
            .iter()
            .map(|list| {
                list.iter()
                    .map(|&e| ((min_error - e) / range * top_range).exp())
                    .collect()
            })
            .collect()
    } else {
        errors.to_vec()
    };

    let total = weights.iter().flatten().sum();
    ErrorWeights { weights, total }
}

/// Average numeric predictions weighted by their error.
///
/// Each record's `confidence` is read as an error magnitude and turned into a
/// weight by [`normalize_errors`]; lower error means exponentially more weight.
/// Returns `NaN` when the weights sum to zero.
///
/// # Errors
///
/// Returns [`TallyError::InsufficientData`] if a record carries no error value.
pub fn error_weighted_average(batch: &PredictionBatch, top_range: f64) -> Result<f64> {
    let mut values = Vec::new();
    let mut errors = Vec::with_capacity(batch.len());

    for bucket in batch {
        let Some(value) = bucket.value.as_number() else {
            continue;
        };
        let bucket_errors = bucket
            .records
            .iter()
            .map(|record| {
                record.confidence.ok_or_else(|| {
                    TallyError::InsufficientData(format!(
                        "prediction {} at rank {} carries no error value",
                        value, record.rank
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        values.extend(std::iter::repeat_n(value, bucket_errors.len()));
        errors.push(bucket_errors);
    }

    let normalized = normalize_errors(&errors, top_range);
    let weights: Array1<f64> = normalized.weights.into_iter().flatten().collect();

    Ok(weighted_mean(&Array1::from_vec(values), &weights, normalized.total))
}

/// Count, min, max and median of every numeric prediction in the batch.
///
/// All statistics are `NaN` for a batch with no records.
pub fn numeric_summary(batch: &PredictionBatch) -> NumericSummary {
    let mut values = expanded_values(batch);
    values.sort_by(f64::total_cmp);

    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            min: f64::NAN,
            max: f64::NAN,
            median: f64::NAN,
        };
    }

    let mid = count / 2;
    let median = if count % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };

    NumericSummary {
        count,
        min: values[0],
        max: values[count - 1],
        median,
    }
}
