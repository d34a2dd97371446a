//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for binary-level operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` at the edges (CLI, server startup).
pub type Result<T> = anyhow::Result<T>;

/// Errors produced by the search engine itself.
///
/// Every engine operation except similar-document lookup is total, so this
/// enum stays small.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The requested document id is not in the index.
    #[error("document '{id}' not found")]
    NotFound { id: String },
}

/// Errors raised while loading configuration or document corpora.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The TOML configuration did not parse.
    #[error("invalid configuration in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A corpus file did not parse as JSON documents.
    #[error("invalid document corpus in {} (line {line}): {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// A value parsed but is outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
