//! Approximate string matching: edit distance, normalized similarity and
//! best-match selection over a candidate list.

use rapidfuzz::distance::levenshtein;
use serde::{Deserialize, Serialize};

/// Unit-cost Levenshtein distance between `a` and `b`, over Unicode scalar
/// values. Case-sensitive.
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein::distance(a.chars(), b.chars())
}

/// Normalized similarity in `[0, 1]`.
///
/// Identical strings score 1. If exactly one side is empty the score is 0.
/// Otherwise `1 - distance / max_len`, with lengths in characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    1.0 - edit_distance(a, b) as f64 / len_a.max(len_b) as f64
}

/// Options for [`find_best_match`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestMatchOptions {
    /// The top candidate is only reported as the best match at or above this.
    pub min_similarity: f64,
    /// Compare lowercased forms of query and candidates.
    pub ignore_case: bool,
}

impl Default for BestMatchOptions {
    fn default() -> Self {
        Self {
            min_similarity: 0.5,
            ignore_case: true,
        }
    }
}

/// A candidate with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    /// The candidate as given (not case-folded).
    pub candidate: String,
    /// Position of the candidate in the input list.
    pub index: usize,
    pub similarity: f64,
}

/// Output of [`find_best_match`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    /// All candidates, most similar first. Ties keep input order.
    pub ratings: Vec<Rating>,
    /// The top rating, if it clears `min_similarity`.
    pub best: Option<Rating>,
}

/// Rates every candidate against `query` and picks the best one.
pub fn find_best_match<S: AsRef<str>>(
    query: &str,
    candidates: &[S],
    options: &BestMatchOptions,
) -> BestMatch {
    let query = fold(query, options.ignore_case);

    let mut ratings: Vec<Rating> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let candidate: &str = candidate.as_ref();
            Rating {
                similarity: similarity(&query, &fold(candidate, options.ignore_case)),
                candidate: candidate.to_string(),
                index,
            }
        })
        .collect();

    // sort_by is stable, so equal similarities keep input order
    ratings.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

    let best = ratings
        .first()
        .filter(|top| top.similarity >= options.min_similarity)
        .cloned();

    BestMatch { ratings, best }
}

fn fold(text: &str, ignore_case: bool) -> String {
    if ignore_case {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}
