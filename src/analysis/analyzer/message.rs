//! Message analyzer for English crisis-message text.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lemma::LemmaFilter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// The analyzer used for message text throughout the pipeline: alphanumeric
/// tokenization, lowercasing, English stopword removal, lemmatization.
pub struct MessageAnalyzer {
    inner: PipelineAnalyzer,
}

impl MessageAnalyzer {
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .add_filter(Arc::new(LemmaFilter::new()));

        Ok(Self { inner: analyzer })
    }
}

impl Default for MessageAnalyzer {
    fn default() -> Self {
        Self::new().expect("Message analyzer should be creatable with default settings")
    }
}

impl Analyzer for MessageAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "message"
    }
}

impl Debug for MessageAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
