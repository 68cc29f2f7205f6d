//! Command line argument parsing for the Triage CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Triage - a multi-label classification pipeline for crisis messages
#[derive(Parser, Debug, Clone)]
#[command(name = "triage")]
#[command(about = "ETL and training pipeline for multi-label crisis message classification")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TriageArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format for the evaluation report
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TriageArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the ETL job: merge, clean and persist the CSV exports
    #[command(name = "process-data")]
    ProcessData(ProcessDataArgs),

    /// Train the classifier from a processed database
    Train(TrainArgs),
}

/// Arguments for the ETL job
#[derive(Parser, Debug, Clone)]
pub struct ProcessDataArgs {
    /// Path to the messages CSV export
    #[arg(value_name = "MESSAGES_CSV")]
    pub messages_path: PathBuf,

    /// Path to the categories CSV export
    #[arg(value_name = "CATEGORIES_CSV")]
    pub categories_path: PathBuf,

    /// Path of the SQLite database to write
    #[arg(value_name = "DATABASE")]
    pub database_path: PathBuf,
}

/// Arguments for the training job
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path of the SQLite database produced by process-data
    #[arg(value_name = "DATABASE")]
    pub database_path: PathBuf,

    /// Destination path for the serialized model artifact
    #[arg(value_name = "MODEL_FILE")]
    pub model_path: PathBuf,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// RNG seed for the train/test split and tree bagging
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of cross-validation folds for the grid search
    #[arg(long, default_value_t = 5)]
    pub folds: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_data() {
        let args = TriageArgs::try_parse_from([
            "triage",
            "process-data",
            "messages.csv",
            "categories.csv",
            "triage.db",
        ])
        .unwrap();

        match args.command {
            Command::ProcessData(ref cmd) => {
                assert_eq!(cmd.messages_path, PathBuf::from("messages.csv"));
                assert_eq!(cmd.database_path, PathBuf::from("triage.db"));
            }
            _ => panic!("expected process-data"),
        }
    }

    #[test]
    fn test_parse_train_defaults() {
        let args =
            TriageArgs::try_parse_from(["triage", "train", "triage.db", "classifier.bin"]).unwrap();

        match args.command {
            Command::Train(ref cmd) => {
                assert_eq!(cmd.test_size, 0.2);
                assert_eq!(cmd.seed, 42);
                assert_eq!(cmd.folds, 5);
            }
            _ => panic!("expected train"),
        }
    }

    #[test]
    fn test_wrong_argument_count_is_usage_error() {
        let result = TriageArgs::try_parse_from(["triage", "process-data", "messages.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_quiet_wins() {
        let args = TriageArgs::try_parse_from([
            "triage", "-q", "-vv", "train", "a.db", "b.bin",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
