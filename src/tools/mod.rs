//! MCP tool handlers. Each handler takes the shared [`KbState`](crate::KbState)
//! and a request, and returns the text shown to the client.

pub mod documents;
pub mod knowledge;
pub mod search;
pub mod suggest;

pub use documents::*;
pub use knowledge::*;
pub use search::*;
pub use suggest::*;

use crate::search::SearchResult;
use std::fmt::Write as _;

/// Characters of content shown under each result.
const SNIPPET_CHARS: usize = 160;

/// Renders ranked results as a numbered list with relative relevance.
pub(crate) fn format_results(heading: &str, results: &[SearchResult<'_>]) -> String {
    let mut output = format!("{} ({} results):\n\n", heading, results.len());
    let max_score = results.first().map_or(1.0, |r| r.score);

    for (idx, result) in results.iter().enumerate() {
        let doc = result.document;
        let relevance = relevance_percent(result.score, max_score);
        let _ = write!(output, "{}. [{}]", idx + 1, doc.id);
        if let Some(title) = &doc.title {
            let _ = write!(output, " {}", title);
        }
        let _ = writeln!(output, " - score: {:.3}, relevance: {}%", result.score, relevance);

        if let Some(category) = &doc.category {
            let _ = writeln!(output, "   category: {}", category);
        }
        if !doc.tags.is_empty() {
            let _ = writeln!(output, "   tags: {}", doc.tags.join(", "));
        }
        if !result.matches.is_empty() {
            let matched: Vec<String> = result
                .matches
                .iter()
                .map(|m| format!("{} ({})", m.field, m.terms.join(", ")))
                .collect();
            let _ = writeln!(output, "   matched: {}", matched.join("; "));
        }
        let _ = writeln!(output, "   {}", snippet(&doc.content));
        output.push('\n');
    }

    output
}

/// `score` as a percentage of the top score, clamped to `0..=100`.
/// Non-positive or non-finite top scores give 0.
fn relevance_percent(score: f64, max_score: f64) -> u8 {
    if !(max_score > 0.0 && max_score.is_finite()) {
        return 0;
    }
    (score / max_score * 100.0).clamp(0.0, 100.0).round() as u8
}

/// First line of `content`, cut to [`SNIPPET_CHARS`] characters.
fn snippet(content: &str) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();
    if first_line.chars().count() > SNIPPET_CHARS {
        let cut: String = first_line.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}
