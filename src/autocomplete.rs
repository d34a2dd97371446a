//! Autocomplete suggestions from a candidate list.

use crate::search::{TokenizeOptions, tokenize};
use serde::{Deserialize, Serialize};

const EXACT_SCORE: f64 = 1.0;
const PREFIX_FACTOR: f64 = 0.9;
const SUBSTRING_FACTOR: f64 = 0.75;
const TOKEN_FACTOR: f64 = 0.5;

/// Options for [`find_autocomplete_suggestions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteOptions {
    pub max_suggestions: usize,
    pub min_score: f64,
    /// Only score candidates that start with the partial input.
    pub prefix_only: bool,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            min_score: 0.1,
            prefix_only: false,
        }
    }
}

/// A candidate completion and how well it fits the partial input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub score: f64,
}

/// Ranks `candidates` as completions of `partial`, best first.
///
/// Comparisons are case-insensitive. Lengths are measured in characters.
pub fn find_autocomplete_suggestions<S: AsRef<str>>(
    partial: &str,
    candidates: &[S],
    options: &AutocompleteOptions,
) -> Vec<Suggestion> {
    if partial.is_empty() {
        return vec![];
    }

    let partial_lower = partial.to_lowercase();
    let partial_len = partial.chars().count() as f64;
    let token_options = TokenizeOptions::default().without_stemming();
    let partial_tokens = tokenize(partial, &token_options);

    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|candidate| {
            let candidate: &str = candidate.as_ref();
            let lower = candidate.to_lowercase();
            let ratio = partial_len / candidate.chars().count().max(1) as f64;

            let score = if options.prefix_only {
                if lower.starts_with(&partial_lower) { ratio } else { 0.0 }
            } else if lower == partial_lower {
                EXACT_SCORE
            } else if lower.starts_with(&partial_lower) {
                PREFIX_FACTOR * ratio
            } else if lower.contains(&partial_lower) {
                SUBSTRING_FACTOR * ratio
            } else {
                token_overlap(&partial_tokens, &tokenize(candidate, &token_options))
            };

            (score >= options.min_score).then(|| Suggestion {
                text: candidate.to_string(),
                score,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(options.max_suggestions);
    suggestions
}

/// `0.5 × share of partial tokens that prefix some candidate token`.
fn token_overlap(partial_tokens: &[String], candidate_tokens: &[String]) -> f64 {
    if partial_tokens.is_empty() {
        return 0.0;
    }
    let matching = partial_tokens
        .iter()
        .filter(|p| candidate_tokens.iter().any(|c| c.starts_with(p.as_str())))
        .count();
    TOKEN_FACTOR * matching as f64 / partial_tokens.len() as f64
}
