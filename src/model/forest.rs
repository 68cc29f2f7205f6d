//! Multi-output random forest classification.
//!
//! One `smartcore` random forest is fitted per label column, mirroring a
//! multi-output wrapper around a single-output ensemble. A label column
//! that is constant in the training data cannot be handed to the library
//! (a single-class fit fails), so it becomes a constant predictor and is
//! recorded as such in the artifact.

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::SplitCriterion;

use crate::error::{Result, TriageError};

/// Split-quality criterion for tree construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitQuality {
    Gini,
    Entropy,
}

impl SplitQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitQuality::Gini => "gini",
            SplitQuality::Entropy => "entropy",
        }
    }

    fn to_smartcore(self) -> SplitCriterion {
        match self {
            SplitQuality::Gini => SplitCriterion::Gini,
            SplitQuality::Entropy => SplitCriterion::Entropy,
        }
    }
}

/// Hyperparameters of one pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Whether the vectorizer applies IDF weighting.
    pub use_idf: bool,
    /// Split-quality criterion for the forests.
    pub criterion: SplitQuality,
    /// Number of trees per forest.
    pub n_trees: u16,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            use_idf: true,
            criterion: SplitQuality::Gini,
            n_trees: 10,
        }
    }
}

impl ModelParams {
    /// The exhaustive search grid: IDF on/off x {gini, entropy} x
    /// {10, 100} trees.
    pub fn grid() -> Vec<ModelParams> {
        let mut grid = Vec::with_capacity(8);
        for &use_idf in &[true, false] {
            for &criterion in &[SplitQuality::Gini, SplitQuality::Entropy] {
                for &n_trees in &[10u16, 100] {
                    grid.push(ModelParams {
                        use_idf,
                        criterion,
                        n_trees,
                    });
                }
            }
        }
        grid
    }
}

impl std::fmt::Display for ModelParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "use_idf={}, criterion={}, n_trees={}",
            self.use_idf,
            self.criterion.as_str(),
            self.n_trees
        )
    }
}

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Predictor for a single label column.
#[derive(Debug, Serialize, Deserialize)]
enum LabelPredictor {
    /// The label was constant in the training data.
    Constant(u32),
    /// A fitted random forest.
    Forest(Box<Forest>),
}

/// One fitted random forest per label column.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultiOutputForest {
    predictors: Vec<LabelPredictor>,
}

impl MultiOutputForest {
    /// Fit one forest per label column.
    ///
    /// `labels` rows must all have the same width; `seed` makes tree
    /// bagging reproducible.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[Vec<u8>],
        params: &ModelParams,
        seed: u64,
    ) -> Result<Self> {
        if features.is_empty() || features.len() != labels.len() {
            return Err(TriageError::model(format!(
                "feature/label row mismatch: {} features, {} labels",
                features.len(),
                labels.len()
            )));
        }
        let label_count = labels[0].len();
        if label_count == 0 {
            return Err(TriageError::model("no label columns to fit"));
        }

        let x = DenseMatrix::from_2d_vec(&features.to_vec());

        let mut predictors = Vec::with_capacity(label_count);
        for column in 0..label_count {
            let y: Vec<u32> = labels.iter().map(|row| u32::from(row[column])).collect();

            let first = y[0];
            if y.iter().all(|&value| value == first) {
                predictors.push(LabelPredictor::Constant(first));
                continue;
            }

            let parameters = RandomForestClassifierParameters::default()
                .with_n_trees(params.n_trees)
                .with_criterion(params.criterion.to_smartcore())
                .with_seed(seed);
            let forest = RandomForestClassifier::fit(&x, &y, parameters).map_err(|e| {
                TriageError::model(format!("random forest fit failed for column {column}: {e}"))
            })?;
            predictors.push(LabelPredictor::Forest(Box::new(forest)));
        }

        Ok(MultiOutputForest { predictors })
    }

    /// Predict every label column for a batch of feature rows.
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<u8>>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        let x = DenseMatrix::from_2d_vec(&features.to_vec());

        // Column-major predictions, then transpose into rows.
        let mut columns = Vec::with_capacity(self.predictors.len());
        for (index, predictor) in self.predictors.iter().enumerate() {
            let column = match predictor {
                LabelPredictor::Constant(value) => vec![*value; features.len()],
                LabelPredictor::Forest(forest) => forest.predict(&x).map_err(|e| {
                    TriageError::model(format!(
                        "random forest predict failed for column {index}: {e}"
                    ))
                })?,
            };
            columns.push(column);
        }

        let mut rows = vec![Vec::with_capacity(columns.len()); features.len()];
        for column in &columns {
            for (row, &value) in rows.iter_mut().zip(column) {
                row.push(value as u8);
            }
        }
        Ok(rows)
    }

    /// Number of label columns this model predicts.
    pub fn label_count(&self) -> usize {
        self.predictors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two clearly separable clusters in one feature dimension, two label
    /// columns: the first tracks the cluster, the second is constant.
    fn toy_data() -> (Vec<Vec<f64>>, Vec<Vec<u8>>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..8 {
            let low = i < 4;
            let value = if low { 0.1 } else { 0.9 } + (i % 4) as f64 * 0.01;
            features.push(vec![value, 1.0 - value]);
            labels.push(vec![u8::from(!low), 0]);
        }
        (features, labels)
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (features, labels) = toy_data();
        let params = ModelParams {
            n_trees: 5,
            ..ModelParams::default()
        };
        let model = MultiOutputForest::fit(&features, &labels, &params, 42).unwrap();

        let predictions = model.predict(&features).unwrap();
        assert_eq!(predictions.len(), features.len());
        assert_eq!(model.label_count(), 2);
        for (prediction, truth) in predictions.iter().zip(&labels) {
            assert_eq!(prediction[0], truth[0]);
        }
    }

    #[test]
    fn test_constant_label_column() {
        let (features, labels) = toy_data();
        let params = ModelParams::default();
        let model = MultiOutputForest::fit(&features, &labels, &params, 42).unwrap();

        let predictions = model.predict(&features).unwrap();
        assert!(predictions.iter().all(|row| row[1] == 0));
    }

    #[test]
    fn test_fit_empty_fails() {
        let err = MultiOutputForest::fit(&[], &[], &ModelParams::default(), 42).unwrap_err();
        assert!(matches!(err, TriageError::Model(_)));
    }

    #[test]
    fn test_param_grid_has_eight_configurations() {
        let grid = ModelParams::grid();
        assert_eq!(grid.len(), 8);
        assert!(grid.iter().any(|p| p.use_idf && p.n_trees == 100));
        assert!(
            grid.iter()
                .any(|p| !p.use_idf && p.criterion == SplitQuality::Entropy)
        );
    }
}
