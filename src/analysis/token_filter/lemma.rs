//! Lemmatization filter implementation.
//!
//! Reduces inflected English words to a dictionary base form using an
//! irregular-noun table plus ordered suffix-detachment rules. This is the
//! morphy-style noun treatment: plural endings are detached, everything
//! else passes through unchanged. Deterministic and pure; the tables are
//! compile-time constants.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Irregular noun forms that no suffix rule can recover.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("halves", "half"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("men", "man"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("teeth", "tooth"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

/// Suffix-detachment rules, tried in order. The first matching rule wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ches", "ch"),
    ("shes", "sh"),
    ("sses", "ss"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("s", ""),
];

static IRREGULAR_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_NOUNS.iter().copied().collect());

/// Rule-based English lemmatizer.
///
/// # Examples
///
/// ```
/// use triage::analysis::token_filter::lemma::Lemmatizer;
///
/// let lemmatizer = Lemmatizer::new();
/// assert_eq!(lemmatizer.lemmatize("floods"), "flood");
/// assert_eq!(lemmatizer.lemmatize("supplies"), "supply");
/// assert_eq!(lemmatizer.lemmatize("children"), "child");
/// assert_eq!(lemmatizer.lemmatize("water"), "water");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Lemmatizer;

impl Lemmatizer {
    /// Create a new lemmatizer.
    pub fn new() -> Self {
        Lemmatizer
    }

    /// Lemmatize a single word. Assumes lowercase input.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = IRREGULAR_MAP.get(word) {
            return (*base).to_string();
        }

        // Short words and non-plural endings pass through untouched.
        if word.len() <= 3 || !word.ends_with('s') {
            return word.to_string();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                // Detaching a bare "s" from words like "class" or "crisis"
                // would not yield a real base form.
                if *suffix == "s" && (stem.ends_with('s') || stem.ends_with('u') || stem.ends_with('i')) {
                    return word.to_string();
                }
                if stem.is_empty() {
                    return word.to_string();
                }
                return format!("{stem}{replacement}");
            }
        }

        word.to_string()
    }
}

/// A filter that lemmatizes each token.
#[derive(Clone, Debug, Default)]
pub struct LemmaFilter {
    lemmatizer: Arc<Lemmatizer>,
}

impl LemmaFilter {
    /// Create a new lemma filter.
    pub fn new() -> Self {
        LemmaFilter {
            lemmatizer: Arc::new(Lemmatizer::new()),
        }
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let lemmatizer = Arc::clone(&self.lemmatizer);
        let filtered = tokens.map(move |mut token| {
            let lemma = lemmatizer.lemmatize(&token.text);
            if lemma != token.text {
                token.text = lemma;
            }
            token
        });

        Ok(Box::new(filtered))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}
