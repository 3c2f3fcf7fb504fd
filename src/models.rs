use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the Superstore Sales dataset, as shipped in the CSV export.
/// The order date is kept raw here; `dataset::load_rows` coerces it and
/// drops rows whose date cannot be parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesRow {
    #[serde(rename = "Order Date")]
    pub order_date: String,
    #[serde(rename = "Sub-Category")]
    pub sub_category: String,
    #[serde(rename = "Sales")]
    pub sales: f64,
}

/// A sales row with its order date already parsed.
#[derive(Debug, Clone)]
pub struct DatedSale {
    pub order_date: NaiveDate,
    pub sub_category: String,
    pub sales: f64,
}

/// One monthly bucket: month-end date plus total sales for that month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub sales: f64,
}

/// Additive decomposition of a monthly series. All three series are aligned
/// with the input buckets; trend and residual are None at the edges where
/// the centered moving average has no full window.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

/// Direction the seasonal component predicts for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expectation {
    Increase,
    Drop,
}

impl Expectation {
    pub fn label(&self) -> &'static str {
        match self {
            Expectation::Increase => "Expected Increase",
            Expectation::Drop => "Expected Drop",
        }
    }
}

/// Outcome of comparing the recorded (residual) value against the
/// seasonally expected value for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    FailedIncrease,
    ExceededIncrease,
    BelowExpectedDrop,
    DropExceeded,
    MetExpectation,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::FailedIncrease => "Failed",
            Outcome::ExceededIncrease => "Exceeded",
            Outcome::BelowExpectedDrop => "Below Expected",
            Outcome::DropExceeded => "Exceeded",
            Outcome::MetExpectation => "Meets Expectations",
        }
    }
}

/// One classified bucket, ready for console, markdown, or CSV emission.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceRecord {
    pub month: NaiveDate,
    pub expectation: Expectation,
    pub expected_value: f64,
    pub recorded_value: f64,
    pub outcome: Outcome,
    pub magnitude: f64,
}

/// Running magnitude totals per outcome category, scoped to one
/// sub-category evaluation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceTotals {
    pub failed_increases: f64,
    pub exceeded_increases: f64,
    pub below_expected_drops: f64,
    pub drops_exceeded: f64,
    pub met_expectations: usize,
}

impl PerformanceTotals {
    pub fn add(&mut self, outcome: Outcome, magnitude: f64) {
        match outcome {
            Outcome::FailedIncrease => self.failed_increases += magnitude,
            Outcome::ExceededIncrease => self.exceeded_increases += magnitude,
            Outcome::BelowExpectedDrop => self.below_expected_drops += magnitude,
            Outcome::DropExceeded => self.drops_exceeded += magnitude,
            Outcome::MetExpectation => self.met_expectations += 1,
        }
    }
}

/// Full evaluation result for one product sub-category.
#[derive(Debug, Clone, Serialize)]
pub struct SubCategoryEvaluation {
    pub sub_category: String,
    pub records: Vec<PerformanceRecord>,
    pub totals: PerformanceTotals,
    pub months_evaluated: usize,
    pub months_skipped: usize,
}
