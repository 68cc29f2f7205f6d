//! Exhaustive grid search over the pipeline hyperparameters.
//!
//! Every configuration in the grid is scored by k-fold cross-validation
//! on the training split, with the vectorizer re-fitted per fold on that
//! fold's training rows only. The best configuration (first wins on
//! ties) is then refitted on the full training split.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::analysis::analyzer::Analyzer;
use crate::error::{Result, TriageError};
use crate::model::forest::{ModelParams, MultiOutputForest};
use crate::model::metrics::subset_accuracy;
use crate::model::tfidf::TfidfVectorizer;

/// Default number of cross-validation folds.
const DEFAULT_FOLDS: usize = 5;

/// The fitted outcome of a grid search.
#[derive(Debug)]
pub struct GridSearchResult {
    /// Winning configuration.
    pub params: ModelParams,
    /// Mean cross-validation subset accuracy of the winning configuration.
    pub cv_score: f64,
    /// Vectorizer refitted on the full training split.
    pub vectorizer: TfidfVectorizer,
    /// Forests refitted on the full training split.
    pub forest: MultiOutputForest,
}

/// Exhaustive search over a parameter grid.
///
/// Construct, optionally adjust the grid/folds/seed, call [`fit`], then
/// read the best estimator from [`best`].
///
/// [`fit`]: GridSearch::fit
/// [`best`]: GridSearch::best
#[derive(Debug)]
pub struct GridSearch {
    param_grid: Vec<ModelParams>,
    folds: usize,
    seed: u64,
    cv_results: Vec<(ModelParams, f64)>,
    best: Option<GridSearchResult>,
}

impl GridSearch {
    /// Create a search over the default 8-configuration grid.
    pub fn new() -> Self {
        GridSearch {
            param_grid: ModelParams::grid(),
            folds: DEFAULT_FOLDS,
            seed: 42,
            cv_results: Vec::new(),
            best: None,
        }
    }

    /// Replace the parameter grid.
    pub fn with_param_grid(mut self, param_grid: Vec<ModelParams>) -> Self {
        self.param_grid = param_grid;
        self
    }

    /// Set the number of cross-validation folds.
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Set the RNG seed used for fold assignment and tree bagging.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cross-validate every configuration, then refit the best one on the
    /// full training data.
    pub fn fit(
        &mut self,
        analyzer: &dyn Analyzer,
        texts: &[String],
        labels: &[Vec<u8>],
    ) -> Result<()> {
        if self.param_grid.is_empty() {
            return Err(TriageError::invalid_operation("empty parameter grid"));
        }
        if texts.len() < 2 {
            return Err(TriageError::invalid_operation(format!(
                "grid search needs at least 2 training rows, got {}",
                texts.len()
            )));
        }

        let folds = self.folds.clamp(2, texts.len());
        let fold_assignment = self.assign_folds(texts.len(), folds);

        self.cv_results.clear();
        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (index, params) in self.param_grid.iter().enumerate() {
            let score = self.cross_validate(analyzer, texts, labels, params, &fold_assignment, folds)?;
            debug!("cv score {score:.4} for {params}");
            self.cv_results.push((*params, score));
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }

        let params = self.param_grid[best_index];
        info!("best configuration: {params} (cv score {best_score:.4})");

        // Refit the winner on everything.
        let mut vectorizer = TfidfVectorizer::new(params.use_idf);
        vectorizer.fit(analyzer, texts)?;
        let features = vectorizer.transform_all(analyzer, texts)?;
        let forest = MultiOutputForest::fit(&features, labels, &params, self.seed)?;

        self.best = Some(GridSearchResult {
            params,
            cv_score: best_score,
            vectorizer,
            forest,
        });
        Ok(())
    }

    /// The best estimator, once [`fit`](GridSearch::fit) has run.
    pub fn best(&self) -> Option<&GridSearchResult> {
        self.best.as_ref()
    }

    /// Consume the search, yielding the best estimator.
    pub fn into_best(self) -> Option<GridSearchResult> {
        self.best
    }

    /// Mean cross-validation score per configuration, in grid order.
    pub fn cv_results(&self) -> &[(ModelParams, f64)] {
        &self.cv_results
    }

    /// Shuffled round-robin fold assignment for each row.
    fn assign_folds(&self, rows: usize, folds: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let mut assignment = vec![0; rows];
        for (rank, &row) in indices.iter().enumerate() {
            assignment[row] = rank % folds;
        }
        assignment
    }

    fn cross_validate(
        &self,
        analyzer: &dyn Analyzer,
        texts: &[String],
        labels: &[Vec<u8>],
        params: &ModelParams,
        fold_assignment: &[usize],
        folds: usize,
    ) -> Result<f64> {
        let mut total = 0.0;
        for fold in 0..folds {
            let mut train_texts = Vec::new();
            let mut train_labels = Vec::new();
            let mut val_texts = Vec::new();
            let mut val_labels = Vec::new();
            for (row, &assigned) in fold_assignment.iter().enumerate() {
                if assigned == fold {
                    val_texts.push(texts[row].clone());
                    val_labels.push(labels[row].clone());
                } else {
                    train_texts.push(texts[row].clone());
                    train_labels.push(labels[row].clone());
                }
            }

            let mut vectorizer = TfidfVectorizer::new(params.use_idf);
            vectorizer.fit(analyzer, &train_texts)?;
            let train_features = vectorizer.transform_all(analyzer, &train_texts)?;
            let val_features = vectorizer.transform_all(analyzer, &val_texts)?;

            let model = MultiOutputForest::fit(&train_features, &train_labels, params, self.seed)?;
            let predictions = model.predict(&val_features)?;
            total += subset_accuracy(&val_labels, &predictions);
        }
        Ok(total / folds as f64)
    }
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::MessageAnalyzer;
    use crate::model::forest::SplitQuality;

    /// Two clearly separated topics, two label columns.
    fn toy_corpus() -> (Vec<String>, Vec<Vec<u8>>) {
        let water = [
            "we need drinking water urgently",
            "water supply is broken in town",
            "please send clean water bottles",
            "no water since the storm hit",
            "water trucks needed at the camp",
            "families asking for water today",
        ];
        let shelter = [
            "house collapsed we need shelter",
            "looking for tents and shelter",
            "shelter needed for displaced families",
            "our home was destroyed need housing",
            "emergency shelter after the earthquake",
            "roof gone need temporary housing",
        ];

        let mut texts = Vec::new();
        let mut labels = Vec::new();
        for message in water {
            texts.push(message.to_string());
            labels.push(vec![1, 0]);
        }
        for message in shelter {
            texts.push(message.to_string());
            labels.push(vec![0, 1]);
        }
        (texts, labels)
    }

    fn small_grid() -> Vec<ModelParams> {
        vec![
            ModelParams {
                use_idf: true,
                criterion: SplitQuality::Gini,
                n_trees: 5,
            },
            ModelParams {
                use_idf: false,
                criterion: SplitQuality::Entropy,
                n_trees: 5,
            },
        ]
    }

    #[test]
    fn test_grid_search_fits_and_selects() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let (texts, labels) = toy_corpus();

        let mut search = GridSearch::new()
            .with_param_grid(small_grid())
            .with_folds(3)
            .with_seed(7);
        search.fit(&analyzer, &texts, &labels).unwrap();

        assert_eq!(search.cv_results().len(), 2);
        let best = search.best().unwrap();
        assert!(best.cv_score >= 0.0);
        assert_eq!(best.forest.label_count(), 2);
    }

    #[test]
    fn test_grid_search_best_predicts_training_topics() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let (texts, labels) = toy_corpus();

        let mut search = GridSearch::new()
            .with_param_grid(small_grid())
            .with_folds(2)
            .with_seed(7);
        search.fit(&analyzer, &texts, &labels).unwrap();

        let best = search.best().unwrap();
        let features = best
            .vectorizer
            .transform_all(&analyzer, &texts)
            .unwrap();
        let predictions = best.forest.predict(&features).unwrap();
        let accuracy = subset_accuracy(&labels, &predictions);
        assert!(accuracy > 0.7, "training accuracy too low: {accuracy}");
    }

    #[test]
    fn test_grid_search_rejects_tiny_input() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let mut search = GridSearch::new().with_param_grid(small_grid());
        let err = search
            .fit(&analyzer, &["one message".to_string()], &[vec![1]])
            .unwrap_err();
        assert!(matches!(err, TriageError::InvalidOperation(_)));
    }

    #[test]
    fn test_grid_search_empty_grid_fails() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let (texts, labels) = toy_corpus();
        let mut search = GridSearch::new().with_param_grid(Vec::new());
        assert!(search.fit(&analyzer, &texts, &labels).is_err());
    }
}
