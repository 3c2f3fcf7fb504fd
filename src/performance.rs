use crate::dataset;
use crate::decompose::{self, DEFAULT_PERIOD};
use crate::models::{
    DatedSale, Decomposition, Expectation, MonthlyPoint, Outcome, PerformanceRecord,
    PerformanceTotals, SubCategoryEvaluation,
};

/// Classify one bucket's recorded residual against its seasonal expectation.
///
/// Returns the outcome and the absolute deviation between the two values.
/// A bucket with no seasonal signal (exactly zero) carries no expectation to
/// evaluate against and is excluded, so the result is None.
pub fn classify(seasonal: f64, residual: f64) -> Option<(Outcome, f64)> {
    let magnitude = (seasonal - residual).abs();

    if seasonal > 0.0 {
        if residual < seasonal {
            Some((Outcome::FailedIncrease, magnitude))
        } else if residual > seasonal {
            Some((Outcome::ExceededIncrease, magnitude))
        } else {
            Some((Outcome::MetExpectation, 0.0))
        }
    } else if seasonal < 0.0 {
        if residual < seasonal {
            Some((Outcome::BelowExpectedDrop, magnitude))
        } else if residual > seasonal {
            Some((Outcome::DropExceeded, magnitude))
        } else {
            Some((Outcome::MetExpectation, 0.0))
        }
    } else {
        None
    }
}

/// Run one evaluation pass over a sub-category's aligned monthly buckets.
///
/// Buckets where the decomposition could not produce a residual (the edge
/// months) are skipped and counted, not treated as errors. Totals are fresh
/// for each call.
pub fn evaluate(
    sub_category: &str,
    months: &[MonthlyPoint],
    decomposition: &Decomposition,
) -> SubCategoryEvaluation {
    let mut records = Vec::new();
    let mut totals = PerformanceTotals::default();
    let mut months_skipped = 0usize;

    for (point, (seasonal, residual)) in months.iter().zip(
        decomposition
            .seasonal
            .iter()
            .zip(decomposition.residual.iter()),
    ) {
        let Some(residual) = *residual else {
            months_skipped += 1;
            continue;
        };

        let Some((outcome, magnitude)) = classify(*seasonal, residual) else {
            months_skipped += 1;
            continue;
        };

        totals.add(outcome, magnitude);
        records.push(PerformanceRecord {
            month: point.month,
            expectation: if *seasonal < 0.0 {
                Expectation::Drop
            } else {
                Expectation::Increase
            },
            expected_value: *seasonal,
            recorded_value: residual,
            outcome,
            magnitude,
        });
    }

    SubCategoryEvaluation {
        sub_category: sub_category.to_string(),
        months_evaluated: records.len(),
        months_skipped,
        records,
        totals,
    }
}

/// Evaluate every sub-category in the dataset (or just one, when a filter
/// is given). Sub-categories with too few months for the decomposition are
/// skipped with a note rather than aborting the run.
pub fn evaluate_all(
    rows: &[DatedSale],
    sub_category: Option<&str>,
) -> Vec<SubCategoryEvaluation> {
    let labels = match sub_category {
        Some(label) => vec![label.to_string()],
        None => dataset::sub_categories(rows),
    };

    let mut evaluations = Vec::new();
    for label in labels {
        let months = dataset::monthly_sales(rows, &label);
        let sales: Vec<f64> = months.iter().map(|point| point.sales).collect();

        match decompose::decompose(&sales, DEFAULT_PERIOD) {
            Ok(decomposition) => {
                evaluations.push(evaluate(&label, &months, &decomposition));
            }
            Err(err) => {
                eprintln!("Skipping {label}: {err}");
            }
        }
    }

    evaluations
}
