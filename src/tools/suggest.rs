//! Autocomplete over document titles or caller-supplied candidates.

use crate::autocomplete::{AutocompleteOptions, find_autocomplete_suggestions};
use crate::state::KbState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AutocompleteRequest {
    /// Partial input to complete
    pub partial: String,
    /// Strings to complete against (default: titles of all indexed documents)
    #[serde(default)]
    pub candidates: Option<Vec<String>>,
    /// Maximum number of suggestions (default: 5)
    #[serde(default)]
    pub max_suggestions: Option<usize>,
    /// Suggestions scoring below this are dropped (default: 0.1)
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Only suggest candidates starting with the partial input (default: false)
    #[serde(default)]
    pub prefix_only: Option<bool>,
}

/// Suggest completions for partial input.
pub async fn handle_autocomplete(
    state: &Arc<KbState>,
    request: AutocompleteRequest,
) -> Result<String, String> {
    let defaults = AutocompleteOptions::default();
    let options = AutocompleteOptions {
        max_suggestions: request.max_suggestions.unwrap_or(defaults.max_suggestions),
        min_score: request.min_score.unwrap_or(defaults.min_score),
        prefix_only: request.prefix_only.unwrap_or(defaults.prefix_only),
    };

    let candidates = match request.candidates {
        Some(candidates) => candidates,
        None => state
            .read()
            .await
            .index()
            .all_documents()
            .iter()
            .filter_map(|doc| doc.title.clone())
            .collect(),
    };

    let suggestions = find_autocomplete_suggestions(&request.partial, &candidates, &options);
    if suggestions.is_empty() {
        return Ok(format!("No suggestions for '{}'.", request.partial));
    }

    let mut output = format!("Suggestions for '{}':\n\n", request.partial);
    for (idx, suggestion) in suggestions.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {} (score: {:.2})",
            idx + 1,
            suggestion.text,
            suggestion.score
        );
    }
    Ok(output)
}
