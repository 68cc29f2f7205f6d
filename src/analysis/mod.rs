//! Text analysis pipeline for message normalization.
//!
//! The pipeline turns raw message text into a stream of normalized tokens:
//! tokenize on alphanumeric runs, lowercase, drop English stopwords, and
//! lemmatize what remains. Analysis is deterministic and pure; all word
//! tables are compile-time constants, so there is no runtime resource
//! loading and no ambient module state.
//!
//! # Examples
//!
//! ```
//! use triage::analysis::analyzer::{Analyzer, MessageAnalyzer};
//!
//! let analyzer = MessageAnalyzer::new().unwrap();
//! let tokens: Vec<String> = analyzer
//!     .analyze("Hello, World! 123")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(tokens, vec!["hello", "world", "123"]);
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, MessageAnalyzer, PipelineAnalyzer};
pub use token::{Token, TokenStream};
