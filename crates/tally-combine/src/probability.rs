//! Probability reshaping for probability-weighted voting.

use tally_traits::{PredictionBatch, PredictionRecord, Result, TallyError};

/// Rebuild a categorical batch so every predictor votes for every class in its
/// leaf distribution.
///
/// Each `(class, count)` pair of a record's distribution becomes a record for
/// `class` carrying `count / total_instances` as its confidence and the
/// original record's rank. Predictors are walked in rank order. The candidate
/// set widens to every class any leaf mentions, not only the predictors' top
/// choices.
///
/// # Errors
///
/// Returns [`TallyError::MissingDistribution`] if any record lacks a
/// distribution or instance total.
pub fn probability_weight(batch: &PredictionBatch) -> Result<PredictionBatch> {
    let mut records: Vec<&PredictionRecord> = batch.records().collect();
    records.sort_by_key(|record| record.rank);

    let mut reshaped = PredictionBatch::new();
    for record in records {
        let (Some(distribution), Some(total)) = (&record.distribution, record.total_instances)
        else {
            return Err(TallyError::MissingDistribution(format!(
                "prediction '{}' at rank {} has no class distribution",
                record.value, record.rank
            )));
        };

        for (class, count) in distribution {
            let probability = *count as f64 / total as f64;
            reshaped.push(
                PredictionRecord::label(class.clone(), record.rank).with_confidence(probability),
            )?;
        }
    }

    Ok(reshaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tally_traits::PredictionValue;

    #[test]
    fn test_even_distribution_splits_into_thirds() {
        let batch = PredictionBatch::from_records(vec![
            PredictionRecord::label("x", 4)
                .with_confidence(0.33)
                .with_distribution([("x", 50), ("y", 50), ("z", 50)], 150),
        ])
        .unwrap();

        let reshaped = probability_weight(&batch).unwrap();
        assert_eq!(reshaped.len(), 3);

        for class in ["x", "y", "z"] {
            let records = reshaped.get(&PredictionValue::from(class)).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].rank, 4);
            assert_relative_eq!(records[0].confidence.unwrap(), 1.0 / 3.0);
        }
    }

    #[test]
    fn test_widens_to_classes_nobody_voted_for() {
        let batch = PredictionBatch::from_records(vec![
            PredictionRecord::label("a", 0).with_distribution([("a", 6), ("c", 4)], 10),
            PredictionRecord::label("b", 1).with_distribution([("b", 5), ("c", 5)], 10),
        ])
        .unwrap();

        let reshaped = probability_weight(&batch).unwrap();
        let classes: Vec<_> = reshaped.iter().map(|b| b.value.to_string()).collect();
        assert_eq!(classes, vec!["a", "c", "b"]);

        let c = reshaped.get(&PredictionValue::from("c")).unwrap();
        let ranks: Vec<_> = c.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![0, 1]);
        assert_relative_eq!(c[0].confidence.unwrap(), 0.4);
        assert_relative_eq!(c[1].confidence.unwrap(), 0.5);
    }

    #[test]
    fn test_reshapes_in_predictor_order() {
        let batch = PredictionBatch::from_records(vec![
            PredictionRecord::label("p", 0).with_distribution([("p", 10)], 10),
            PredictionRecord::label("q", 1).with_distribution([("x", 10)], 10),
            PredictionRecord::label("p", 2).with_distribution([("x", 10)], 10),
        ])
        .unwrap();

        let reshaped = probability_weight(&batch).unwrap();
        let ranks: Vec<_> = reshaped
            .get(&PredictionValue::from("x"))
            .unwrap()
            .iter()
            .map(|r| r.rank)
            .collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_missing_distribution_fails() {
        let batch = PredictionBatch::from_records(vec![
            PredictionRecord::label("a", 0).with_distribution([("a", 1)], 1),
            PredictionRecord::label("b", 1).with_confidence(0.9),
        ])
        .unwrap();

        assert!(matches!(
            probability_weight(&batch),
            Err(TallyError::MissingDistribution(_))
        ));
    }
}
