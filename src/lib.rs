//! In-memory TF-IDF search over knowledge-base documents, with fuzzy matching,
//! autocomplete and an MCP server front end.

pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod fuzzy;
pub mod knowledge;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use autocomplete::{AutocompleteOptions, Suggestion, find_autocomplete_suggestions};
pub use config::{EngineConfig, KeywordRule, NoteKeywords, SearchDefaults};
pub use document::Document;
pub use error::{ConfigError, Result, SearchError};
pub use fuzzy::{BestMatch, BestMatchOptions, Rating, edit_distance, find_best_match, similarity};
pub use knowledge::{EntryOptions, KnowledgeBaseFinder, NoteMatches, NoteQuery};
pub use search::{
    FieldMatch, FieldSpec, FieldWeights, FilterOptions, RankedRecord, Record, SearchIndex,
    SearchOptions, SearchResult, SimilarOptions, TokenizeOptions, filter_and_rank_documents,
    tokenize,
};
pub use server::KbServer;
pub use state::KbState;
