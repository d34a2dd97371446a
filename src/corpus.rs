//! Loading document collections from disk.
//!
//! Two layouts are accepted: a single JSON array of documents, or JSON lines
//! (one document object per line, blank lines ignored).

use crate::config::expand_tilde;
use crate::document::Document;
use crate::error::ConfigError;
use ahash::AHashSet;
use std::path::Path;

/// Reads documents from `path`. A leading `~` expands to the home directory.
pub fn load_documents(path: &str) -> Result<Vec<Document>, ConfigError> {
    let expanded = expand_tilde(path);
    let path = Path::new(expanded.as_ref());
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let documents = drop_unusable(parse_documents(&source, path)?);
    tracing::info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Parses a JSON array or JSON-lines document collection.
pub fn parse_documents(source: &str, path: &Path) -> Result<Vec<Document>, ConfigError> {
    if source.trim_start().starts_with('[') {
        return serde_json::from_str(source).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        });
    }

    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                line: number + 1,
                source,
            })
        })
        .collect()
}

/// Drops entries with an empty id and every repeat of an id already seen.
fn drop_unusable(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = AHashSet::with_capacity(documents.len());
    documents
        .into_iter()
        .enumerate()
        .filter(|(position, doc)| {
            if doc.id.trim().is_empty() {
                tracing::warn!("Skipping corpus entry {} with an empty id", position);
                return false;
            }
            if !seen.insert(doc.id.clone()) {
                tracing::warn!("Skipping corpus entry {}: duplicate id '{}'", position, doc.id);
                return false;
            }
            true
        })
        .map(|(_, doc)| doc)
        .collect()
}
