//! Full-text search infrastructure.
//!
//! This module provides TF-IDF based search over [`Document`](crate::Document)s,
//! including tokenization, field weighting, indexing, scoring and ranking.

// Module declarations
pub mod engine;
pub mod filter;
pub mod index;
pub mod scoring;
pub mod store;
pub mod tokenize;

// Public re-exports (used via lib.rs)
pub use engine::{FieldMatch, SearchIndex, SearchOptions, SearchResult, SimilarOptions};
pub use filter::{FieldSpec, FilterOptions, RankedRecord, Record, filter_and_rank_documents};
pub use index::InvertedIndex;
pub use store::{DocumentStore, FieldWeights};
pub use tokenize::{STOP_WORDS, TokenizeOptions, stem, tokenize};
