//! Combine command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::Path;
use tally::{
    CandidateScore, PredictionBatch, PredictionRecord, PredictionValue, VoteCombiner, VoteConfig,
};
use tracing::{info, warn};

/// Result line printed for one input row.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum RowOutcome {
    Combined {
        row: usize,
        prediction: PredictionValue,
        confidence: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ranking: Option<Vec<CandidateScore>>,
    },
    Failed {
        row: usize,
        error: String,
    },
}

/// Read prediction rows, combine each one and print a JSON line per row.
///
/// A row that fails to combine is reported and does not stop the others.
pub(crate) fn combine_rows(input: &Path, config: VoteConfig, rank: bool) -> Result<()> {
    let raw = read_input(input)?;
    let rows: Vec<Vec<PredictionRecord>> =
        serde_json::from_str(&raw).context("parsing prediction rows")?;

    info!(rows = rows.len(), method = %config.method, "combining prediction rows");

    let combiner = VoteCombiner::new(config);
    let mut out = io::stdout().lock();
    let mut failed = 0;

    for (row, records) in rows.into_iter().enumerate() {
        let outcome = combine_row(&combiner, row, records, rank);
        if matches!(outcome, RowOutcome::Failed { .. }) {
            failed += 1;
        }
        writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
    }

    if failed > 0 {
        warn!(failed, "some rows could not be combined");
    }
    Ok(())
}

/// Combine one row, turning any error into a [`RowOutcome::Failed`].
pub(crate) fn combine_row(
    combiner: &VoteCombiner,
    row: usize,
    records: Vec<PredictionRecord>,
    rank: bool,
) -> RowOutcome {
    let combined = PredictionBatch::from_records(records).and_then(|batch| {
        let consensus = combiner.combine_with_confidence(&batch)?;
        let ranking = if rank && !consensus.prediction.is_number() {
            Some(combiner.rank(&batch)?)
        } else {
            None
        };
        Ok((consensus, ranking))
    });

    match combined {
        Ok((consensus, ranking)) => RowOutcome::Combined {
            row,
            prediction: consensus.prediction,
            confidence: consensus.confidence,
            ranking,
        },
        Err(e) => {
            warn!(row, error = %e, "row not combined");
            RowOutcome::Failed {
                row,
                error: e.to_string(),
            }
        }
    }
}

fn read_input(input: &Path) -> Result<String> {
    let mut raw = String::new();
    if input == Path::new("-") {
        io::stdin()
            .read_to_string(&mut raw)
            .context("reading predictions from stdin")?;
    } else {
        raw = std::fs::read_to_string(input)
            .with_context(|| format!("reading predictions from {}", input.display()))?;
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally::CombinationMethod;

    fn rows(json: &str) -> Vec<Vec<PredictionRecord>> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_combine_row_categorical_with_ranking() {
        let combiner = VoteCombiner::with_method(CombinationMethod::ConfidenceWeighted);
        let mut input = rows(
            r#"[[
                {"value": "a", "confidence": 0.26289, "rank": 0},
                {"value": "a", "confidence": 0.22343, "rank": 1},
                {"value": "b", "confidence": 0.1783, "rank": 2}
            ]]"#,
        );

        let outcome = combine_row(&combiner, 0, input.remove(0), true);
        let RowOutcome::Combined {
            prediction,
            ranking,
            ..
        } = outcome
        else {
            panic!("row should combine");
        };

        assert_eq!(prediction, PredictionValue::from("a"));
        assert_eq!(ranking.unwrap().len(), 2);
    }

    #[test]
    fn test_combine_row_numeric_skips_ranking() {
        let combiner = VoteCombiner::default();
        let mut input = rows(r#"[[{"value": 1.0, "rank": 0}, {"value": 2.0, "rank": 1}]]"#);

        let outcome = combine_row(&combiner, 3, input.remove(0), true);
        let json = serde_json::to_string(&outcome).unwrap();

        assert_eq!(json, r#"{"row":3,"prediction":1.5,"confidence":null}"#);
    }

    #[test]
    fn test_combine_row_reports_errors() {
        let combiner = VoteCombiner::with_method(CombinationMethod::ProbabilityWeighted);
        let mut input = rows(r#"[[{"value": "a", "rank": 0}]]"#);

        let outcome = combine_row(&combiner, 1, input.remove(0), false);
        assert!(matches!(outcome, RowOutcome::Failed { row: 1, .. }));

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("Missing distribution"));
    }

    #[test]
    fn test_combine_row_rejects_unordered_ranks() {
        let mut input = rows(r#"[[{"value": "a", "rank": 2}, {"value": "b", "rank": 1}]]"#);

        let outcome = combine_row(&VoteCombiner::default(), 0, input.remove(0), false);
        let RowOutcome::Failed { error, .. } = outcome else {
            panic!("unordered ranks should fail");
        };
        assert!(error.starts_with("Invalid input"));
    }

    #[test]
    fn test_combine_row_empty_is_invalid() {
        let outcome = combine_row(&VoteCombiner::default(), 0, Vec::new(), false);
        let RowOutcome::Failed { error, .. } = outcome else {
            panic!("empty row should fail");
        };
        assert!(error.starts_with("Invalid input"));
    }
}
