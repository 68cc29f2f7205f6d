//! Command implementations for the Triage CLI.

use crate::analysis::analyzer::MessageAnalyzer;
use crate::cli::args::*;
use crate::cli::output::{TrainingSummary, output_report};
use crate::error::{Result, TriageError};
use crate::etl;
use crate::model::grid::GridSearch;
use crate::model::metrics::classification_report;
use crate::model::persist::TriageModel;
use crate::model::train_test_split;

/// Execute a CLI command.
pub fn execute_command(args: TriageArgs) -> Result<()> {
    match &args.command {
        Command::ProcessData(process_args) => process_data(process_args.clone(), &args),
        Command::Train(train_args) => train(train_args.clone(), &args),
    }
}

/// Run the ETL job: load, merge, clean, persist.
fn process_data(args: ProcessDataArgs, cli_args: &TriageArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Loading data...");
        println!("    MESSAGES: {}", args.messages_path.display());
        println!("    CATEGORIES: {}", args.categories_path.display());
    }
    let messages = etl::load_messages(&args.messages_path)?;
    let categories = etl::load_categories(&args.categories_path)?;
    let merged = etl::merge(messages, categories);
    if cli_args.verbosity() > 1 {
        println!("    merged {} rows", merged.len());
    }

    if cli_args.verbosity() > 0 {
        println!("Cleaning data...");
    }
    let table = etl::clean(merged)?;

    if cli_args.verbosity() > 0 {
        println!("Saving data...");
        println!("    DATABASE: {}", args.database_path.display());
    }
    etl::save_table(&table, &args.database_path)?;

    if cli_args.verbosity() > 0 {
        println!(
            "Cleaned data saved to database ({} rows, {} categories)",
            table.len(),
            table.label_names.len()
        );
    }
    Ok(())
}

/// Run the training job: load, split, grid-search, evaluate, persist.
fn train(args: TrainArgs, cli_args: &TriageArgs) -> Result<()> {
    if args.test_size <= 0.0 || args.test_size >= 1.0 {
        return Err(TriageError::invalid_operation(format!(
            "test size must be in (0, 1), got {}",
            args.test_size
        )));
    }

    if cli_args.verbosity() > 0 {
        println!("Loading data...");
        println!("    DATABASE: {}", args.database_path.display());
    }
    let dataset = etl::load_dataset(&args.database_path)?;
    if dataset.is_empty() {
        return Err(TriageError::invalid_operation(
            "database contains no rows to train on",
        ));
    }

    let (train_texts, train_labels, test_texts, test_labels) = train_test_split(
        &dataset.texts,
        &dataset.labels,
        args.test_size,
        args.seed,
    );

    if cli_args.verbosity() > 0 {
        println!("Building model...");
    }
    let analyzer = MessageAnalyzer::new()?;
    let mut search = GridSearch::new()
        .with_folds(args.folds)
        .with_seed(args.seed);

    if cli_args.verbosity() > 0 {
        println!("Training model...");
    }
    search.fit(&analyzer, &train_texts, &train_labels)?;

    if cli_args.verbosity() > 0 {
        println!("Evaluating model...");
    }
    let best = search
        .best()
        .ok_or_else(|| TriageError::model("grid search produced no estimator"))?;
    let test_features = best.vectorizer.transform_all(&analyzer, &test_texts)?;
    let predictions = best.forest.predict(&test_features)?;
    let report = classification_report(&dataset.label_names, &test_labels, &predictions);

    let summary = TrainingSummary {
        params: best.params,
        cv_score: best.cv_score,
        train_rows: train_texts.len(),
        test_rows: test_texts.len(),
        report,
    };
    output_report(&summary, cli_args)?;

    if cli_args.verbosity() > 0 {
        println!("Saving model...");
        println!("    MODEL: {}", args.model_path.display());
    }
    let result = search
        .into_best()
        .ok_or_else(|| TriageError::model("grid search produced no estimator"))?;
    let model = TriageModel::from_search(result, dataset.label_names);
    model.save(&args.model_path)?;

    if cli_args.verbosity() > 0 {
        println!("Trained model saved");
    }
    Ok(())
}
