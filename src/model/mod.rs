//! Training stage: TF-IDF vectorization, per-label random forests, grid
//! search, evaluation, and model persistence.

pub mod forest;
pub mod grid;
pub mod metrics;
pub mod persist;
pub mod tfidf;

pub use forest::{ModelParams, MultiOutputForest, SplitQuality};
pub use grid::{GridSearch, GridSearchResult};
pub use metrics::{ClassMetrics, LabelReport, classification_report, subset_accuracy};
pub use persist::TriageModel;
pub use tfidf::TfidfVectorizer;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Split texts and labels into a train and a held-out test partition.
///
/// Rows are shuffled with a seeded RNG so a run is reproducible; the last
/// `test_size` fraction of the shuffle (at least one row when the input
/// has two or more) becomes the test partition.
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    texts: &[String],
    labels: &[Vec<u8>],
    test_size: f64,
    seed: u64,
) -> (Vec<String>, Vec<Vec<u8>>, Vec<String>, Vec<Vec<u8>>) {
    debug_assert_eq!(texts.len(), labels.len());

    let mut indices: Vec<usize> = (0..texts.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut test_count = (texts.len() as f64 * test_size).round() as usize;
    if test_count == 0 && texts.len() > 1 {
        test_count = 1;
    }
    let train_count = texts.len() - test_count;

    let mut train_texts = Vec::with_capacity(train_count);
    let mut train_labels = Vec::with_capacity(train_count);
    let mut test_texts = Vec::with_capacity(test_count);
    let mut test_labels = Vec::with_capacity(test_count);

    for (rank, &index) in indices.iter().enumerate() {
        if rank < train_count {
            train_texts.push(texts[index].clone());
            train_labels.push(labels[index].clone());
        } else {
            test_texts.push(texts[index].clone());
            test_labels.push(labels[index].clone());
        }
    }

    (train_texts, train_labels, test_texts, test_labels)
}
