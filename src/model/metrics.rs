//! Per-category evaluation metrics.
//!
//! Computes precision, recall, F1 and support for every class of every
//! label column, plus the subset accuracy used as the grid-search score.
//! This is a report, not a gate: training proceeds to persistence
//! regardless of what is printed.

use serde::Serialize;

/// Metrics for a single class value within one label column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub class: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of truth rows with this class.
    pub support: usize,
}

/// The per-class report for one label column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelReport {
    pub label: String,
    pub classes: Vec<ClassMetrics>,
}

/// Fraction of rows where every label matches exactly.
pub fn subset_accuracy(truth: &[Vec<u8>], predictions: &[Vec<u8>]) -> f64 {
    debug_assert_eq!(truth.len(), predictions.len());
    if truth.is_empty() {
        return 0.0;
    }
    let exact = truth
        .iter()
        .zip(predictions)
        .filter(|(t, p)| t == p)
        .count();
    exact as f64 / truth.len() as f64
}

/// Build a classification report for every label column.
///
/// For each label, classes are the distinct values present in either the
/// truth or the prediction column, in ascending order. Precision and
/// recall degrade to 0.0 when their denominator is empty.
pub fn classification_report(
    label_names: &[String],
    truth: &[Vec<u8>],
    predictions: &[Vec<u8>],
) -> Vec<LabelReport> {
    debug_assert_eq!(truth.len(), predictions.len());

    label_names
        .iter()
        .enumerate()
        .map(|(column, label)| {
            let truth_column: Vec<u8> = truth.iter().map(|row| row[column]).collect();
            let predicted_column: Vec<u8> =
                predictions.iter().map(|row| row[column]).collect();

            let mut classes: Vec<u8> = truth_column
                .iter()
                .chain(predicted_column.iter())
                .copied()
                .collect();
            classes.sort_unstable();
            classes.dedup();

            let class_metrics = classes
                .into_iter()
                .map(|class| {
                    let true_positive = truth_column
                        .iter()
                        .zip(&predicted_column)
                        .filter(|&(&t, &p)| t == class && p == class)
                        .count();
                    let predicted_count =
                        predicted_column.iter().filter(|&&p| p == class).count();
                    let support = truth_column.iter().filter(|&&t| t == class).count();

                    let precision = if predicted_count > 0 {
                        true_positive as f64 / predicted_count as f64
                    } else {
                        0.0
                    };
                    let recall = if support > 0 {
                        true_positive as f64 / support as f64
                    } else {
                        0.0
                    };
                    let f1 = if precision + recall > 0.0 {
                        2.0 * precision * recall / (precision + recall)
                    } else {
                        0.0
                    };

                    ClassMetrics {
                        class,
                        precision,
                        recall,
                        f1,
                        support,
                    }
                })
                .collect();

            LabelReport {
                label: label.clone(),
                classes: class_metrics,
            }
        })
        .collect()
}

impl std::fmt::Display for LabelReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Category: {}", self.label)?;
        writeln!(
            f,
            "  {:>5}  {:>9}  {:>6}  {:>8}  {:>7}",
            "class", "precision", "recall", "f1-score", "support"
        )?;
        for metrics in &self.classes {
            writeln!(
                f,
                "  {:>5}  {:>9.3}  {:>6.3}  {:>8.3}  {:>7}",
                metrics.class, metrics.precision, metrics.recall, metrics.f1, metrics.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_accuracy() {
        let truth = vec![vec![1, 0], vec![0, 0], vec![1, 1]];
        let predictions = vec![vec![1, 0], vec![0, 1], vec![1, 1]];
        let accuracy = subset_accuracy(&truth, &predictions);
        assert!((accuracy - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_subset_accuracy_empty() {
        assert_eq!(subset_accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_classification_report_perfect() {
        let labels = vec!["related".to_string()];
        let truth = vec![vec![1], vec![0], vec![1]];
        let report = classification_report(&labels, &truth, &truth);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].label, "related");
        for metrics in &report[0].classes {
            assert_eq!(metrics.precision, 1.0);
            assert_eq!(metrics.recall, 1.0);
            assert_eq!(metrics.f1, 1.0);
        }
    }

    #[test]
    fn test_classification_report_known_values() {
        let labels = vec!["request".to_string()];
        let truth = vec![vec![1], vec![1], vec![0], vec![0]];
        let predictions = vec![vec![1], vec![0], vec![1], vec![0]];
        let report = classification_report(&labels, &truth, &predictions);

        let ones = report[0].classes.iter().find(|m| m.class == 1).unwrap();
        assert!((ones.precision - 0.5).abs() < 1e-9);
        assert!((ones.recall - 0.5).abs() < 1e-9);
        assert_eq!(ones.support, 2);
    }

    #[test]
    fn test_classification_report_missing_predicted_class() {
        let labels = vec!["offer".to_string()];
        let truth = vec![vec![1], vec![0]];
        let predictions = vec![vec![0], vec![0]];
        let report = classification_report(&labels, &truth, &predictions);

        let ones = report[0].classes.iter().find(|m| m.class == 1).unwrap();
        assert_eq!(ones.precision, 0.0);
        assert_eq!(ones.recall, 0.0);
        assert_eq!(ones.f1, 0.0);
        assert_eq!(ones.support, 1);
    }

    #[test]
    fn test_label_report_display() {
        let labels = vec!["related".to_string()];
        let truth = vec![vec![1], vec![0]];
        let report = classification_report(&labels, &truth, &truth);
        let rendered = format!("{}", report[0]);
        assert!(rendered.contains("Category: related"));
        assert!(rendered.contains("precision"));
    }
}
