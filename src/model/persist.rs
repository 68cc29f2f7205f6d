//! Model artifact persistence.
//!
//! The fitted vectorizer, forests, chosen hyperparameters and label names
//! are bundled into one [`TriageModel`] and written with `bincode`,
//! overwriting any existing artifact. The artifact carries no version
//! marker; it is understood only by the same serialization mechanism that
//! wrote it.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::model::forest::{ModelParams, MultiOutputForest};
use crate::model::grid::GridSearchResult;
use crate::model::tfidf::TfidfVectorizer;

/// A fitted, reloadable classification model.
#[derive(Debug, Serialize, Deserialize)]
pub struct TriageModel {
    pub params: ModelParams,
    pub vectorizer: TfidfVectorizer,
    pub forest: MultiOutputForest,
    pub label_names: Vec<String>,
}

impl TriageModel {
    /// Bundle a grid-search winner with its label names.
    pub fn from_search(result: GridSearchResult, label_names: Vec<String>) -> Self {
        TriageModel {
            params: result.params,
            vectorizer: result.vectorizer,
            forest: result.forest,
            label_names,
        }
    }

    /// Serialize the model to `path`, overwriting any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        debug!("model saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a previously saved model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let model = bincode::deserialize_from(BufReader::new(file))?;
        Ok(model)
    }

    /// Predict label rows for a batch of raw texts.
    pub fn predict(&self, analyzer: &dyn Analyzer, texts: &[String]) -> Result<Vec<Vec<u8>>> {
        let features = self.vectorizer.transform_all(analyzer, texts)?;
        self.forest.predict(&features)
    }
}
