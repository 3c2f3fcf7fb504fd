use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use crate::models::{PerformanceRecord, SubCategoryEvaluation};

/// Console listing for one sub-category: each classified month followed by
/// the four deviation totals.
pub fn print_evaluation(evaluation: &SubCategoryEvaluation) {
    println!();
    println!(
        "Sales Performance Evaluation for {}:",
        evaluation.sub_category
    );

    for record in &evaluation.records {
        println!(
            "Date: {}, Seasonal Value: {:.2}, Residual Value: {:.2} - {} ({})",
            record.month,
            record.expected_value,
            record.recorded_value,
            record.outcome.label(),
            record.expectation.label()
        );
    }

    let totals = &evaluation.totals;
    println!(
        "Expected Increase but Failed Total: {:.2}",
        totals.failed_increases
    );
    println!(
        "Expected Increase and Exceeded Total: {:.2}",
        totals.exceeded_increases
    );
    println!(
        "Below Expected Drop Total: {:.2}",
        totals.below_expected_drops
    );
    println!(
        "Expected Drop but Exceeded Total: {:.2}",
        totals.drops_exceeded
    );
    if evaluation.months_skipped > 0 {
        println!(
            "({} months evaluated, {} skipped)",
            evaluation.months_evaluated, evaluation.months_skipped
        );
    }
}

fn largest_deviations(records: &[PerformanceRecord], take: usize) -> Vec<&PerformanceRecord> {
    let mut sorted: Vec<&PerformanceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.magnitude
            .partial_cmp(&a.magnitude)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(take);
    sorted
}

/// Markdown report across all evaluated sub-categories.
pub fn build_report(evaluations: &[SubCategoryEvaluation], source: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Superstore Sales Performance Report");
    let _ = writeln!(output, "Seasonal expectation vs. recorded outcome, from {source}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Deviation Totals by Sub-Category");
    let _ = writeln!(output);

    if evaluations.is_empty() {
        let _ = writeln!(output, "No sub-categories could be evaluated.");
        return output;
    }

    let _ = writeln!(
        output,
        "| Sub-Category | Failed Increase | Exceeded Increase | Below Expected Drop | Drop Exceeded | Months |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for evaluation in evaluations {
        let totals = &evaluation.totals;
        let _ = writeln!(
            output,
            "| {} | {:.2} | {:.2} | {:.2} | {:.2} | {} |",
            evaluation.sub_category,
            totals.failed_increases,
            totals.exceeded_increases,
            totals.below_expected_drops,
            totals.drops_exceeded,
            evaluation.months_evaluated
        );
    }

    for evaluation in evaluations {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", evaluation.sub_category);
        let _ = writeln!(output);

        if evaluation.records.is_empty() {
            let _ = writeln!(output, "No months with a defined residual in this series.");
            continue;
        }

        let _ = writeln!(output, "Largest deviations from seasonal expectation:");
        for record in largest_deviations(&evaluation.records, 5) {
            let _ = writeln!(
                output,
                "- {} ({}): expected {:.2}, recorded {:.2}, {} by {:.2}",
                record.month,
                record.expectation.label(),
                record.expected_value,
                record.recorded_value,
                record.outcome.label().to_lowercase(),
                record.magnitude
            );
        }
    }

    output
}

/// One CSV file per sub-category: every classified month plus four trailing
/// rows carrying the category totals.
pub fn write_csv(evaluation: &SubCategoryEvaluation, out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let file_name = format!(
        "{}_Sales_Performance.csv",
        evaluation.sub_category.replace(' ', "_")
    );
    let path = out_dir.join(file_name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record([
        "Date",
        "Expectation Type",
        "Expected Value",
        "Recorded Value",
        "Status",
        "Value Difference",
    ])?;

    for record in &evaluation.records {
        writer.write_record([
            record.month.to_string(),
            record.expectation.label().to_string(),
            format!("{:.6}", record.expected_value),
            format!("{:.6}", record.recorded_value),
            record.outcome.label().to_string(),
            format!("{:.6}", record.magnitude),
        ])?;
    }

    let totals = &evaluation.totals;
    let total_rows = [
        ("Expected Increase but Failed Total", totals.failed_increases),
        (
            "Expected Increase and Exceeded Total",
            totals.exceeded_increases,
        ),
        ("Below Expected Drop Total", totals.below_expected_drops),
        ("Expected Drop but Exceeded Total", totals.drops_exceeded),
    ];
    for (label, value) in total_rows {
        writer.write_record([
            "Total".to_string(),
            "N/A".to_string(),
            "N/A".to_string(),
            "N/A".to_string(),
            label.to_string(),
            format!("{value:.6}"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
