//! Knowledge-base retrieval with category and tag preferences, and matching
//! from free-form user notes.

use super::format_results;
use crate::knowledge::EntryOptions;
use crate::state::KbState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindRelevantRequest {
    /// Free-text query
    pub query: String,
    /// Maximum number of results (default from configuration, normally 10)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Results scoring below this are dropped (default from configuration, normally 0.1)
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Preferred categories. Documents in them rank higher; others are not excluded.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Every result must carry all of these tags
    #[serde(default)]
    pub required_tags: Vec<String>,
    /// Documents carrying any of these tags rank higher
    #[serde(default)]
    pub any_tags: Vec<String>,
}

/// Search the knowledge base with category and tag preferences applied.
pub async fn handle_find_relevant(
    state: &Arc<KbState>,
    request: FindRelevantRequest,
) -> Result<String, String> {
    let finder = state.read().await;
    let defaults = finder.default_options();
    let options = EntryOptions {
        limit: request.limit.unwrap_or(defaults.limit),
        min_score: request.min_score.unwrap_or(defaults.min_score),
        categories: request.categories,
        required_tags: request.required_tags,
        any_tags: request.any_tags,
    };

    let results = finder.find_relevant_entries(&request.query, &options);
    if results.is_empty() {
        let mut msg = format!("No relevant entries found for '{}'.", request.query);
        if !options.required_tags.is_empty() {
            let _ = write!(
                msg,
                " Results were limited to documents tagged: {}.",
                options.required_tags.join(", ")
            );
        }
        return Ok(msg);
    }

    Ok(format_results(
        &format!("Relevant entries for '{}'", request.query),
        &results,
    ))
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchNotesRequest {
    /// Free-form notes, e.g. a support ticket or call transcript
    pub notes: String,
    /// Maximum number of results (default from configuration, normally 10)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Results scoring below this are dropped (default from configuration, normally 0.1)
    #[serde(default)]
    pub min_score: Option<f64>,
}

/// Derive a query, categories and tags from notes, then search with them.
pub async fn handle_match_notes(
    state: &Arc<KbState>,
    request: MatchNotesRequest,
) -> Result<String, String> {
    let finder = state.read().await;
    let defaults = finder.default_options();
    let matches = finder.find_matches_for_user_notes(
        &request.notes,
        request.limit.unwrap_or(defaults.limit),
        request.min_score.unwrap_or(defaults.min_score),
    );

    let extracted = &matches.extracted;
    if extracted.query.is_empty() {
        return Err("The notes contain no searchable terms.".to_string());
    }

    let mut output = String::new();
    let _ = writeln!(output, "Extracted query: {}", extracted.query);
    let _ = writeln!(output, "Categories: {}", list_or_none(&extracted.categories));
    let _ = writeln!(output, "Tags: {}\n", list_or_none(&extracted.tags));

    if matches.results.is_empty() {
        output.push_str("No matching entries found.\n");
    } else {
        output.push_str(&format_results("Matching entries", &matches.results));
    }
    Ok(output)
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
