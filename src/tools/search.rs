//! Free-text search and similar-document lookup.

use super::format_results;
use crate::error::SearchError;
use crate::fuzzy::{BestMatchOptions, find_best_match};
use crate::search::{SearchOptions, SimilarOptions};
use crate::state::KbState;
use ahash::AHashMap;
use rmcp::schemars;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// Ids offered when `find_similar` is given an unknown id.
const MAX_ID_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Maximum number of results (default from configuration, normally 10)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Results scoring below this are dropped (default from configuration, normally 0.1)
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Per-document score multipliers, keyed by document id
    #[serde(default)]
    pub boost: Option<HashMap<String, f64>>,
}

/// Run a TF-IDF query against the knowledge base.
pub async fn handle_search(state: &Arc<KbState>, request: SearchRequest) -> Result<String, String> {
    let finder = state.read().await;
    let defaults = finder.default_options();

    let options = SearchOptions {
        limit: request.limit.unwrap_or(defaults.limit),
        min_score: request.min_score.unwrap_or(defaults.min_score),
        boost: request
            .boost
            .unwrap_or_default()
            .into_iter()
            .collect::<AHashMap<_, _>>(),
    };

    let results = finder.index().search(&request.query, &options);
    if results.is_empty() {
        return Ok(no_results_message(&request.query, finder.index().document_count()));
    }

    Ok(format_results(
        &format!("Search results for '{}'", request.query),
        &results,
    ))
}

fn no_results_message(query: &str, document_count: usize) -> String {
    let mut msg = format!(
        "No results found for '{}' among {} documents.\n\n",
        query, document_count
    );
    msg.push_str("Search tips:\n");
    msg.push_str("• Try fewer or more general terms\n");
    msg.push_str("• Common words like 'the' or 'how' are ignored\n");
    msg.push_str("• Lower min_score to see weaker matches\n");
    msg
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindSimilarRequest {
    /// Id of the document to compare against
    pub id: String,
    /// Maximum number of results (default: 5)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Results scoring below this are dropped (default: 0.1)
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Include the source document itself in the results (default: false)
    #[serde(default)]
    pub include_self: Option<bool>,
}

/// List documents resembling a known document.
pub async fn handle_find_similar(
    state: &Arc<KbState>,
    request: FindSimilarRequest,
) -> Result<String, String> {
    let finder = state.read().await;
    let defaults = SimilarOptions::default();
    let options = SimilarOptions {
        limit: request.limit.unwrap_or(defaults.limit),
        min_score: request.min_score.unwrap_or(defaults.min_score),
        exclude_self: !request.include_self.unwrap_or(!defaults.exclude_self),
    };

    let results = match finder.index().find_similar_documents(&request.id, &options) {
        Ok(results) => results,
        Err(SearchError::NotFound { id }) => {
            let ids: Vec<&str> = finder
                .index()
                .all_documents()
                .iter()
                .map(|doc| doc.id.as_str())
                .collect();
            return Err(unknown_id_message(&id, &ids));
        }
    };

    if results.is_empty() {
        return Ok(format!("No documents similar to '{}' found.", request.id));
    }
    Ok(format_results(
        &format!("Documents similar to '{}'", request.id),
        &results,
    ))
}

/// Error text for an unknown id, with close matches among `known_ids`.
pub(crate) fn unknown_id_message(id: &str, known_ids: &[&str]) -> String {
    let mut msg = format!("Document '{}' not found.", id);
    let matches = find_best_match(id, known_ids, &BestMatchOptions::default());
    let close: Vec<&str> = matches
        .ratings
        .iter()
        .take(MAX_ID_SUGGESTIONS)
        .filter(|rating| rating.similarity >= BestMatchOptions::default().min_similarity)
        .map(|rating| rating.candidate.as_str())
        .collect();

    if !close.is_empty() {
        msg.push_str(" Did you mean one of these?\n\n");
        for candidate in close {
            let _ = writeln!(msg, "• `{}`", candidate);
        }
    }
    msg
}
