//! Lightweight ranking over arbitrary string-keyed records, independent of
//! any [`SearchIndex`](super::SearchIndex).

use crate::document::Document;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use super::tokenize::{TokenizeOptions, tokenize};

/// Score for a field equal to the query (case-insensitive).
const EXACT_SCORE: f64 = 1.0;
/// Score for a field containing the whole query.
const CONTAINS_SCORE: f64 = 0.75;
/// Ceiling for partial token overlap.
const TOKEN_OVERLAP_SCORE: f64 = 0.5;

/// Anything that exposes named text fields.
pub trait Record {
    /// Text of `field`, or `None` when absent or not textual.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Record for Document {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(&self.id)),
            "content" => Some(Cow::Borrowed(&self.content)),
            "title" => self.title.as_deref().map(Cow::Borrowed),
            "tags" => Some(Cow::Owned(self.joined_tags())),
            "category" => self.category.as_deref().map(Cow::Borrowed),
            key => self.metadata.get(key).and_then(json_text),
        }
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).and_then(json_text)
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).and_then(json_text)
    }
}

impl<S: AsRef<str>> Record for HashMap<String, S> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

impl<S: AsRef<str>> Record for BTreeMap<String, S> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

/// Strings as-is, string arrays space-joined; other JSON values are ignored.
fn json_text(value: &serde_json::Value) -> Option<Cow<'_, str>> {
    match value {
        serde_json::Value::String(s) => Some(Cow::Borrowed(s)),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(serde_json::Value::as_str).collect();
            (!parts.is_empty()).then(|| Cow::Owned(parts.join(" ")))
        }
        _ => None,
    }
}

/// A field to score and its weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub weight: f64,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Options for [`filter_and_rank_documents`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    pub limit: usize,
    /// Records must score strictly above zero and at least this much.
    pub min_score: f64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_score: 0.0,
        }
    }
}

/// A record with its overlap score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord<'a, T> {
    pub record: &'a T,
    pub score: f64,
}

/// Scores each record by weighted substring/token overlap with `query` and
/// returns the matching ones, best first. Ties keep input order.
///
/// Per field: equality scores 1.0, containing the whole query 0.75, otherwise
/// 0.5 × the share of query tokens found in the field. Each field score is
/// multiplied by its weight and summed.
pub fn filter_and_rank_documents<'a, T: Record>(
    records: &'a [T],
    query: &str,
    fields: &[FieldSpec],
    options: &FilterOptions,
) -> Vec<RankedRecord<'a, T>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return vec![];
    }
    let query_tokens = tokenize(&query, &TokenizeOptions::default().without_stemming());

    let mut ranked: Vec<RankedRecord<'a, T>> = records
        .iter()
        .filter_map(|record| {
            let score: f64 = fields
                .iter()
                .filter(|spec| spec.weight > 0.0)
                .filter_map(|spec| {
                    let text = record.field(&spec.name)?;
                    Some(spec.weight * field_score(&text.to_lowercase(), &query, &query_tokens))
                })
                .sum();
            (score > 0.0 && score >= options.min_score).then_some(RankedRecord { record, score })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(options.limit);
    ranked
}

fn field_score(text: &str, query: &str, query_tokens: &[String]) -> f64 {
    if text == query {
        EXACT_SCORE
    } else if text.contains(query) {
        CONTAINS_SCORE
    } else if query_tokens.is_empty() {
        0.0
    } else {
        let found = query_tokens.iter().filter(|t| text.contains(t.as_str())).count();
        TOKEN_OVERLAP_SCORE * found as f64 / query_tokens.len() as f64
    }
}
