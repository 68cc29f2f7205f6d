//! Analyzer implementations combining tokenizers and filters.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into a normalized token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text into a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze text and collect the token texts.
    fn token_texts(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

// Individual analyzer modules
pub mod message;
pub mod pipeline;

// Re-export for convenient access
pub use message::MessageAnalyzer;
pub use pipeline::PipelineAnalyzer;
