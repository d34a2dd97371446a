//! Document storage, field weighting and the per-document term cache.

use crate::document::Document;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tokenize::{TokenizeOptions, tokenize};

/// Relative influence of each document field on term frequency.
///
/// The four built-in fields always have a weight. Metadata keys weigh 0
/// unless listed in `metadata`. Any weight ≤ 0 keeps the field out of the
/// index entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub content: f64,
    pub tags: f64,
    pub category: f64,
    pub metadata: BTreeMap<String, f64>,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3.0,
            content: 1.0,
            tags: 2.0,
            category: 1.5,
            metadata: BTreeMap::new(),
        }
    }
}

impl FieldWeights {
    /// Weight for a metadata key (0 when not configured).
    pub fn metadata_weight(&self, key: &str) -> f64 {
        self.metadata.get(key).copied().unwrap_or(0.0)
    }

    /// Builds the weighted text for `doc`: every field repeated in proportion
    /// to its weight, joined with spaces.
    pub fn weighted_text(&self, doc: &Document) -> String {
        let tags = doc.joined_tags();
        let mut fields: Vec<(f64, &str)> = vec![
            (self.title, doc.title.as_deref().unwrap_or_default()),
            (self.content, doc.content.as_str()),
            (self.tags, tags.as_str()),
            (self.category, doc.category.as_deref().unwrap_or_default()),
        ];
        fields.extend(
            doc.string_metadata()
                .map(|(key, value)| (self.metadata_weight(key), value)),
        );

        let mut parts = Vec::new();
        for (weight, text) in fields {
            expand_field(text, weight, &mut parts);
        }
        parts.join(" ")
    }
}

/// Appends `floor(weight)` copies of `text`, then the first
/// `floor(chars × fraction)` characters for any fractional remainder.
fn expand_field<'a>(text: &'a str, weight: f64, parts: &mut Vec<&'a str>) {
    if text.is_empty() || !weight.is_finite() || weight <= 0.0 {
        return;
    }

    let whole = weight.floor();
    for _ in 0..whole as usize {
        parts.push(text);
    }

    let fraction = weight - whole;
    if fraction > 0.0 {
        let take = (text.chars().count() as f64 * fraction).floor() as usize;
        if take > 0 {
            let end = text.char_indices().nth(take).map_or(text.len(), |(i, _)| i);
            parts.push(&text[..end]);
        }
    }
}

/// Live documents in insertion order plus their tokenized, weighted terms.
///
/// A document id has a cache entry exactly when the document is stored.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    positions: AHashMap<String, usize>,
    terms: AHashMap<String, Vec<String>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `doc` with its precomputed terms. The caller guarantees the id
    /// is not already present.
    pub(crate) fn insert(&mut self, doc: Document, terms: Vec<String>) {
        let id = doc.id.clone();
        self.positions.insert(id.clone(), self.documents.len());
        self.documents.push(doc);
        self.terms.insert(id, terms);
    }

    /// Removes a document and its cache entry.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Document> {
        let position = self.positions.remove(id)?;
        self.terms.remove(id);
        let doc = self.documents.remove(position);
        for later in &self.documents[position..] {
            if let Some(slot) = self.positions.get_mut(later.id.as_str()) {
                *slot -= 1;
            }
        }
        Some(doc)
    }

    /// Replaces every cache entry using `derive`, keeping documents as-is.
    pub(crate) fn recompute_terms<F>(&mut self, mut derive: F)
    where
        F: FnMut(&Document) -> Vec<String>,
    {
        self.terms = self
            .documents
            .iter()
            .map(|doc| (doc.id.clone(), derive(doc)))
            .collect();
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.positions.get(id).map(|&position| &self.documents[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Cached terms for `id`.
    pub fn terms(&self, id: &str) -> Option<&[String]> {
        self.terms.get(id).map(Vec::as_slice)
    }

    /// Documents with their cached terms, in insertion order.
    pub fn iter_with_terms(&self) -> impl Iterator<Item = (&Document, &[String])> {
        self.documents.iter().map(|doc| {
            let terms = self.terms.get(&doc.id).map_or(&[][..], Vec::as_slice);
            (doc, terms)
        })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of cache entries (always equal to [`len`](Self::len)).
    pub fn cached_len(&self) -> usize {
        self.terms.len()
    }
}

/// Weighted, tokenized terms for one document.
pub fn document_terms(doc: &Document, weights: &FieldWeights, options: &TokenizeOptions) -> Vec<String> {
    tokenize(&weights.weighted_text(doc), options)
}
