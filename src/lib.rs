//! # Triage
//!
//! A two-stage batch pipeline for multi-label classification of crisis
//! messages.
//!
//! ## Stages
//!
//! - **ETL** ([`etl`]): merge a messages CSV with a categories CSV on a
//!   shared identifier, unpivot the delimited category string into numeric
//!   label columns, drop invalid and duplicate rows, and persist the result
//!   into a SQLite store.
//! - **Training** ([`model`]): read the store back, vectorize message text
//!   with TF-IDF over a normalizing analyzer ([`analysis`]), fit one random
//!   forest per label under an exhaustive grid search, report per-category
//!   precision/recall/F1 on a held-out split, and serialize the fitted
//!   model.
//!
//! Both stages are strictly linear, single-threaded batch jobs driven by
//! the `triage` CLI ([`cli`]).

pub mod analysis;
pub mod cli;
pub mod error;
pub mod etl;
pub mod model;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
