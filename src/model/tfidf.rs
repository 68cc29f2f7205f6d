//! TF-IDF vectorizer for text feature extraction.
//!
//! Term frequencies are normalized by token count; when `use_idf` is on
//! they are weighted by smoothed inverse document frequency. The analyzer
//! is passed into `fit`/`transform` rather than stored, so a fitted
//! vectorizer serializes to just its vocabulary and weights.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;

/// TF-IDF vectorizer for text feature extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Vocabulary: word -> feature index mapping.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    /// Whether to weight term frequencies by IDF.
    use_idf: bool,
}

impl TfidfVectorizer {
    /// Create a new, unfitted vectorizer.
    pub fn new(use_idf: bool) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            use_idf,
        }
    }

    /// Fit the vectorizer on training documents.
    pub fn fit(&mut self, analyzer: &dyn Analyzer, documents: &[String]) -> Result<()> {
        self.n_documents = documents.len();
        let mut vocabulary = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let tokens = analyzer.token_texts(document)?;
            let unique_tokens: HashSet<String> = tokens.into_iter().collect();

            for token in unique_tokens {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
                let next_index = vocabulary.len();
                vocabulary.entry(token).or_insert(next_index);
            }
        }

        // Smoothed IDF: ln((N + 1) / (df + 1)) + 1
        let mut idf = vec![0.0; vocabulary.len()];
        for (word, &index) in &vocabulary {
            let df = document_frequency.get(word).copied().unwrap_or(0);
            idf[index] = ((self.n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0;
        }

        self.vocabulary = vocabulary;
        self.idf = idf;

        Ok(())
    }

    /// Transform a document into a dense feature vector.
    ///
    /// Tokens outside the fitted vocabulary are ignored.
    pub fn transform(&self, analyzer: &dyn Analyzer, document: &str) -> Result<Vec<f64>> {
        let tokens = analyzer.token_texts(document)?;
        let mut features = vec![0.0; self.vocabulary.len()];

        for token in &tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                features[index] += 1.0;
            }
        }

        // Normalize by document length
        let token_count = tokens.len() as f64;
        if token_count > 0.0 {
            for value in &mut features {
                *value /= token_count;
            }
        }

        if self.use_idf {
            for (index, value) in features.iter_mut().enumerate() {
                *value *= self.idf[index];
            }
        }

        Ok(features)
    }

    /// Transform a batch of documents.
    pub fn transform_all(
        &self,
        analyzer: &dyn Analyzer,
        documents: &[String],
    ) -> Result<Vec<Vec<f64>>> {
        documents
            .iter()
            .map(|document| self.transform(analyzer, document))
            .collect()
    }

    /// Get the size of the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether IDF weighting is enabled.
    pub fn use_idf(&self) -> bool {
        self.use_idf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::MessageAnalyzer;

    fn documents() -> Vec<String> {
        vec![
            "people trapped after the earthquake".to_string(),
            "we need food and water".to_string(),
            "water pipes broken in the city".to_string(),
        ]
    }

    #[test]
    fn test_fit_builds_vocabulary() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let mut vectorizer = TfidfVectorizer::new(true);
        vectorizer.fit(&analyzer, &documents()).unwrap();

        assert!(vectorizer.vocabulary_size() > 0);
    }

    #[test]
    fn test_transform_length_matches_vocabulary() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let mut vectorizer = TfidfVectorizer::new(true);
        vectorizer.fit(&analyzer, &documents()).unwrap();

        let features = vectorizer.transform(&analyzer, "water for the people").unwrap();
        assert_eq!(features.len(), vectorizer.vocabulary_size());
        assert!(features.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_transform_ignores_unknown_tokens() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let mut vectorizer = TfidfVectorizer::new(false);
        vectorizer.fit(&analyzer, &documents()).unwrap();

        let features = vectorizer.transform(&analyzer, "zzzunknown").unwrap();
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_idf_weights_distinctive_terms_higher() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let mut with_idf = TfidfVectorizer::new(true);
        with_idf.fit(&analyzer, &documents()).unwrap();
        let mut without_idf = TfidfVectorizer::new(false);
        without_idf.fit(&analyzer, &documents()).unwrap();

        // "water" appears in two documents, "earthquake" in one; with IDF
        // the rarer term gets the larger weight for an equal-frequency
        // query.
        let weighted = with_idf.transform(&analyzer, "water earthquake").unwrap();
        let unweighted = without_idf.transform(&analyzer, "water earthquake").unwrap();

        let max_weighted = weighted.iter().cloned().fold(0.0, f64::max);
        let max_unweighted = unweighted.iter().cloned().fold(0.0, f64::max);
        assert!(max_weighted > max_unweighted);
    }

    #[test]
    fn test_serialization_round_trip() {
        let analyzer = MessageAnalyzer::new().unwrap();
        let mut vectorizer = TfidfVectorizer::new(true);
        vectorizer.fit(&analyzer, &documents()).unwrap();

        let bytes = bincode::serialize(&vectorizer).unwrap();
        let restored: TfidfVectorizer = bincode::deserialize(&bytes).unwrap();

        let before = vectorizer.transform(&analyzer, "need water").unwrap();
        let after = restored.transform(&analyzer, "need water").unwrap();
        assert_eq!(before, after);
    }
}
