//! Value-bucketed prediction batches.
//!
//! A [`PredictionBatch`] groups the records of one input row by the value they
//! predicted. Buckets keep first-seen order and records keep predictor order,
//! which the tie-break relies on.

use indexmap::{IndexMap, map::Values};

use crate::{PredictionRecord, PredictionValue, Result, TallyError, ValueDomain};

/// Hashable bucket key of a [`PredictionValue`].
///
/// Numbers are keyed by their bit pattern with `-0.0` folded into `0.0` and
/// every `NaN` folded into one, so keys agree with [`PredictionValue::same_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    /// Canonical bits of a number.
    Number(u64),
    /// A label.
    Label(String),
}

impl From<&PredictionValue> for ValueKey {
    fn from(value: &PredictionValue) -> Self {
        match value {
            PredictionValue::Number(n) if n.is_nan() => Self::Number(f64::NAN.to_bits()),
            PredictionValue::Number(n) if *n == 0.0 => Self::Number(0.0_f64.to_bits()),
            PredictionValue::Number(n) => Self::Number(n.to_bits()),
            PredictionValue::Label(label) => Self::Label(label.clone()),
        }
    }
}

/// All records that predicted the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// The shared predicted value.
    pub value: PredictionValue,
    /// Records in insertion (predictor) order.
    pub records: Vec<PredictionRecord>,
}

/// Per-row predictions grouped by predicted value.
///
/// Constructed fresh for every input row and consumed by a single combine call.
///
/// # Example
///
/// ```
/// use tally_traits::{PredictionBatch, PredictionRecord, PredictionValue};
///
/// let mut batch = PredictionBatch::new();
/// batch.push(PredictionRecord::number(1.0, 0)).unwrap();
/// batch.push(PredictionRecord::number(2.0, 1)).unwrap();
/// batch.push(PredictionRecord::number(1.0, 2)).unwrap();
///
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.get(&PredictionValue::Number(1.0)).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionBatch {
    buckets: IndexMap<ValueKey, Bucket>,
    last_rank: Option<usize>,
}

impl PredictionBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from records in predictor order.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] if any record fails
    /// [`PredictionRecord::validate`], or if ranks are not strictly increasing.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = PredictionRecord>,
    {
        let mut batch = Self::new();
        for record in records {
            if let Some(last) = batch.last_rank.filter(|last| record.rank <= *last) {
                return Err(TallyError::InvalidInput(format!(
                    "predictor rank {} does not follow rank {}",
                    record.rank, last
                )));
            }
            batch.push(record)?;
        }
        Ok(batch)
    }

    /// Append a record to the bucket for its value, creating the bucket on
    /// first sight.
    ///
    /// A rank may repeat, since one predictor can vote for several classes,
    /// but it may not go backwards.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] if the record's distribution is
    /// inconsistent with its instance total or its rank precedes the last one
    /// pushed.
    pub fn push(&mut self, record: PredictionRecord) -> Result<()> {
        record.validate()?;

        if let Some(last) = self.last_rank.filter(|last| record.rank < *last) {
            return Err(TallyError::InvalidInput(format!(
                "predictor rank {} arrives after rank {}",
                record.rank, last
            )));
        }
        self.last_rank = Some(record.rank);

        self.buckets
            .entry(ValueKey::from(&record.value))
            .or_insert_with(|| Bucket {
                value: record.value.clone(),
                records: Vec::new(),
            })
            .records
            .push(record);
        Ok(())
    }

    /// Number of distinct predicted values.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the batch has no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of records across all buckets.
    pub fn record_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.records.len()).sum()
    }

    /// Iterate buckets in first-seen order.
    pub fn iter(&self) -> Values<'_, ValueKey, Bucket> {
        self.buckets.values()
    }

    /// Iterate every record, bucket by bucket.
    pub fn records(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.buckets.values().flat_map(|bucket| bucket.records.iter())
    }

    /// Records that predicted `value`, if any.
    pub fn get(&self, value: &PredictionValue) -> Option<&[PredictionRecord]> {
        self.buckets
            .get(&ValueKey::from(value))
            .map(|bucket| bucket.records.as_slice())
    }

    /// Detect whether the batch is numeric or categorical.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] for an empty batch or one that mixes
    /// numbers and labels.
    pub fn domain(&self) -> Result<ValueDomain> {
        let mut values = self.buckets.values().map(|bucket| bucket.value.domain());
        let first = values
            .next()
            .ok_or_else(|| TallyError::InvalidInput("cannot combine an empty batch".to_string()))?;

        if values.any(|domain| domain != first) {
            return Err(TallyError::InvalidInput(
                "batch mixes numeric and categorical predictions".to_string(),
            ));
        }
        Ok(first)
    }
}

impl<'a> IntoIterator for &'a PredictionBatch {
    type Item = &'a Bucket;
    type IntoIter = Values<'a, ValueKey, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_groups_by_value_in_first_seen_order() {
        let batch = PredictionBatch::from_records(vec![
            PredictionRecord::label("b", 0),
            PredictionRecord::label("a", 1),
            PredictionRecord::label("b", 2),
        ])
        .unwrap();

        let values: Vec<_> = batch.iter().map(|b| b.value.to_string()).collect();
        assert_eq!(values, vec!["b", "a"]);

        let ranks: Vec<_> = batch
            .get(&PredictionValue::from("b"))
            .unwrap()
            .iter()
            .map(|r| r.rank)
            .collect();
        assert_eq!(ranks, vec![0, 2]);
        assert_eq!(batch.record_count(), 3);
    }

    #[test]
    fn test_nan_and_signed_zero_share_buckets() {
        let batch = PredictionBatch::from_records(vec![
            PredictionRecord::number(f64::NAN, 0),
            PredictionRecord::number(0.0, 1),
            PredictionRecord::number(-f64::NAN, 2),
            PredictionRecord::number(-0.0, 3),
        ])
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(&PredictionValue::Number(f64::NAN)).unwrap().len(), 2);
        assert_eq!(batch.get(&PredictionValue::Number(-0.0)).unwrap().len(), 2);
        assert!(batch.get(&PredictionValue::from("0")).is_none());
    }

    #[test]
    fn test_push_rejects_invalid_distribution() {
        let mut batch = PredictionBatch::new();
        let record = PredictionRecord::label("a", 0).with_distribution([("a", 10)], 5);
        assert!(matches!(batch.push(record), Err(TallyError::InvalidInput(_))));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_push_rejects_rank_going_backwards() {
        let mut batch = PredictionBatch::new();
        batch.push(PredictionRecord::label("a", 3)).unwrap();
        batch.push(PredictionRecord::label("b", 3)).unwrap();

        assert!(matches!(
            batch.push(PredictionRecord::label("c", 1)),
            Err(TallyError::InvalidInput(_))
        ));
        assert_eq!(batch.record_count(), 2);
    }

    #[test]
    fn test_from_records_rejects_repeated_or_unordered_ranks() {
        let repeated = PredictionBatch::from_records(vec![
            PredictionRecord::label("a", 0),
            PredictionRecord::label("b", 0),
        ]);
        assert!(matches!(repeated, Err(TallyError::InvalidInput(_))));

        let unordered = PredictionBatch::from_records(vec![
            PredictionRecord::label("a", 2),
            PredictionRecord::label("b", 1),
        ]);
        assert!(matches!(unordered, Err(TallyError::InvalidInput(_))));
    }

    #[test]
    fn test_domain_numeric_and_categorical() {
        let numeric = PredictionBatch::from_records(vec![
            PredictionRecord::number(1.0, 0),
            PredictionRecord::number(2.0, 1),
        ])
        .unwrap();
        assert_eq!(numeric.domain().unwrap(), ValueDomain::Numeric);

        let categorical = PredictionBatch::from_records(vec![PredictionRecord::label("x", 0)]).unwrap();
        assert_eq!(categorical.domain().unwrap(), ValueDomain::Categorical);
    }

    #[test]
    fn test_domain_rejects_empty_and_mixed() {
        assert!(matches!(
            PredictionBatch::new().domain(),
            Err(TallyError::InvalidInput(_))
        ));

        let mixed = PredictionBatch::from_records(vec![
            PredictionRecord::number(1.0, 0),
            PredictionRecord::label("x", 1),
        ])
        .unwrap();
        assert!(matches!(mixed.domain(), Err(TallyError::InvalidInput(_))));
    }
}
