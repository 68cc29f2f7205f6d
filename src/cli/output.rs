//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, TriageArgs};
use crate::error::Result;
use crate::model::forest::ModelParams;
use crate::model::metrics::LabelReport;

/// Summary of a finished training run.
#[derive(Debug, Serialize)]
pub struct TrainingSummary {
    pub params: ModelParams,
    pub cv_score: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub report: Vec<LabelReport>,
}

/// Print the evaluation report in the requested format.
pub fn output_report(summary: &TrainingSummary, args: &TriageArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(summary, args),
        OutputFormat::Json => output_json(summary),
    }
}

fn output_human(summary: &TrainingSummary, args: &TriageArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!(
            "Best configuration: {} (cv score {:.4})",
            summary.params, summary.cv_score
        );
        println!(
            "Evaluated on {} held-out rows ({} trained)",
            summary.test_rows, summary.train_rows
        );
        println!();
    }
    for label_report in &summary.report {
        println!("{label_report}");
    }
    Ok(())
}

fn output_json(summary: &TrainingSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
