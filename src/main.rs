use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod dataset;
mod decompose;
mod models;
mod performance;
mod report;

#[derive(Parser)]
#[command(name = "superstore-sales-performance")]
#[command(
    about = "Seasonal expectation vs. recorded sales evaluator for the Superstore dataset",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate sub-categories and print per-month statuses with totals
    Evaluate {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        sub_category: Option<String>,
        /// Emit the evaluations as JSON instead of the console listing
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        sub_category: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write one performance CSV per sub-category
    Export {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        sub_category: Option<String>,
        #[arg(long, default_value = "sales_performance_results")]
        out_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            data,
            sub_category,
            json,
        } => {
            let (rows, skipped) = dataset::load_rows(&data)?;
            if skipped > 0 {
                eprintln!("Dropped {skipped} rows with unparseable order dates.");
            }
            let evaluations = performance::evaluate_all(&rows, sub_category.as_deref());

            if evaluations.is_empty() {
                println!("No sub-categories could be evaluated.");
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&evaluations)?);
            } else {
                for evaluation in &evaluations {
                    report::print_evaluation(evaluation);
                }
            }
        }
        Commands::Report {
            data,
            sub_category,
            out,
        } => {
            let (rows, skipped) = dataset::load_rows(&data)?;
            if skipped > 0 {
                eprintln!("Dropped {skipped} rows with unparseable order dates.");
            }
            let evaluations = performance::evaluate_all(&rows, sub_category.as_deref());
            let report = report::build_report(&evaluations, &data.display().to_string());
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            data,
            sub_category,
            out_dir,
        } => {
            let (rows, skipped) = dataset::load_rows(&data)?;
            if skipped > 0 {
                eprintln!("Dropped {skipped} rows with unparseable order dates.");
            }
            let evaluations = performance::evaluate_all(&rows, sub_category.as_deref());
            for evaluation in &evaluations {
                report::write_csv(evaluation, &out_dir)?;
            }
            println!(
                "Performance files for {} sub-categories written to {}.",
                evaluations.len(),
                out_dir.display()
            );
        }
    }

    Ok(())
}
