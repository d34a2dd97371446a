//! The search index: document store, inverted index and TF-IDF ranking
//! composed behind a single mutation path.

use crate::document::Document;
use crate::error::SearchError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::index::InvertedIndex;
use super::scoring::{idf, term_frequency};
use super::store::{DocumentStore, FieldWeights, document_terms};
use super::tokenize::{TokenizeOptions, tokenize};

/// Query parameters for [`SearchIndex::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub limit: usize,
    pub min_score: f64,
    /// Per-document score multipliers, keyed by document id. Missing ids use 1.0.
    pub boost: AHashMap<String, f64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_score: 0.1,
            boost: AHashMap::new(),
        }
    }
}

/// Query parameters for [`SearchIndex::find_similar_documents`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarOptions {
    pub limit: usize,
    pub min_score: f64,
    pub exclude_self: bool,
}

impl Default for SimilarOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            min_score: 0.1,
            exclude_self: true,
        }
    }
}

/// Query terms found in one field of a result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub field: String,
    pub terms: Vec<String>,
}

/// A ranked document with the evidence used for highlighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'a> {
    pub document: &'a Document,
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

/// In-memory full-text index over [`Document`]s.
///
/// Documents, their cached terms and the inverted index only change through
/// [`add_document`](Self::add_document), [`remove_document`](Self::remove_document)
/// and [`rebuild_index`](Self::rebuild_index), so the three stay consistent.
/// Not synchronized: wrap in a lock to share across threads.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    store: DocumentStore,
    index: InvertedIndex,
    weights: FieldWeights,
    options: TokenizeOptions,
}

impl SearchIndex {
    pub fn new(weights: FieldWeights, options: TokenizeOptions) -> Self {
        Self {
            store: DocumentStore::new(),
            index: InvertedIndex::new(),
            weights,
            options,
        }
    }

    pub fn field_weights(&self) -> &FieldWeights {
        &self.weights
    }

    pub fn tokenize_options(&self) -> &TokenizeOptions {
        &self.options
    }

    /// Adds a document. An existing document with the same id is replaced.
    pub fn add_document(&mut self, doc: Document) {
        if self.store.contains(&doc.id) {
            tracing::debug!("Replacing existing document '{}'", doc.id);
            self.remove_document(&doc.id);
        }

        let terms = document_terms(&doc, &self.weights, &self.options);
        tracing::debug!("Indexing document '{}' ({} terms)", doc.id, terms.len());

        let id = doc.id.clone();
        self.store.insert(doc, terms);
        if let Some(terms) = self.store.terms(&id) {
            self.index.index(&id, terms);
        }
    }

    pub fn add_documents<I>(&mut self, docs: I)
    where
        I: IntoIterator<Item = Document>,
    {
        let start = Instant::now();
        let before = self.store.len();
        for doc in docs {
            self.add_document(doc);
        }
        tracing::info!(
            "Indexed {} documents ({} total, {} unique terms) in {:?}",
            self.store.len().saturating_sub(before),
            self.store.len(),
            self.index.term_count(),
            start.elapsed()
        );
    }

    /// Removes a document, returning it. Unknown ids are a no-op.
    pub fn remove_document(&mut self, id: &str) -> Option<Document> {
        let doc = self.store.remove(id)?;
        let pruned = self.index.deindex(id);
        tracing::debug!("Removed document '{}' ({} terms pruned)", id, pruned);
        Some(doc)
    }

    /// Re-derives the term cache and inverted index from the live documents.
    pub fn rebuild_index(&mut self) {
        let start = Instant::now();
        let (weights, options) = (&self.weights, &self.options);
        self.store
            .recompute_terms(|doc| document_terms(doc, weights, options));

        self.index.clear();
        for (doc, terms) in self.store.iter_with_terms() {
            self.index.index(&doc.id, terms);
        }

        tracing::info!(
            "Rebuilt search index: {} unique terms, {} documents in {:?}",
            self.index.term_count(),
            self.store.len(),
            start.elapsed()
        );
    }

    /// Swaps field weights and rebuilds so cached terms reflect them.
    pub fn set_field_weights(&mut self, weights: FieldWeights) {
        tracing::debug!("Updating field weights: {:?}", weights);
        self.weights = weights;
        self.rebuild_index();
    }

    /// Ranks documents against `query` by summed TF-IDF.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult<'_>> {
        let query_terms = tokenize(query, &self.options);
        if query_terms.is_empty() {
            return vec![];
        }

        let total_docs = self.store.len();
        let mut scores: AHashMap<&str, f64> = AHashMap::new();

        for term in &query_terms {
            let Some(postings) = self.index.postings(term) else {
                continue;
            };
            let term_idf = idf(total_docs, postings.len());
            for doc_id in postings {
                let doc_terms = self.store.terms(doc_id).unwrap_or_default();
                *scores.entry(doc_id.as_str()).or_insert(0.0) +=
                    term_frequency(term, doc_terms) * term_idf;
            }
        }

        tracing::trace!(
            "Query '{}' -> {} terms, {} candidates",
            query,
            query_terms.len(),
            scores.len()
        );

        // Walk the store so equal scores keep insertion order.
        let mut results: Vec<SearchResult<'_>> = self
            .store
            .documents()
            .iter()
            .filter_map(|doc| {
                let raw = scores.get(doc.id.as_str())?;
                let boost = options.boost.get(&doc.id).copied().unwrap_or(1.0);
                Some((doc, raw * boost))
            })
            .filter(|(_, score)| *score >= options.min_score)
            .map(|(doc, score)| SearchResult {
                document: doc,
                score,
                matches: field_matches(doc, &query_terms),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(options.limit);
        results
    }

    /// Finds documents resembling `id`, using its title, content and tags as
    /// the query.
    pub fn find_similar_documents(
        &self,
        id: &str,
        options: &SimilarOptions,
    ) -> Result<Vec<SearchResult<'_>>, SearchError> {
        let source = self
            .store
            .get(id)
            .ok_or_else(|| SearchError::NotFound { id: id.to_string() })?;

        let query = [
            source.title.as_deref().unwrap_or_default(),
            source.content.as_str(),
            source.joined_tags().as_str(),
        ]
        .join(" ");

        let search_options = SearchOptions {
            limit: options.limit.saturating_add(usize::from(options.exclude_self)),
            min_score: options.min_score,
            boost: AHashMap::new(),
        };

        let mut results = self.search(&query, &search_options);
        if options.exclude_self {
            results.retain(|result| result.document.id != id);
        }
        results.truncate(options.limit);
        Ok(results)
    }

    pub fn all_documents(&self) -> &[Document] {
        self.store.documents()
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.store.get(id)
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    /// Cached, weighted terms of a document.
    pub fn document_terms(&self, id: &str) -> Option<&[String]> {
        self.store.terms(id)
    }

    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.index
    }
}

/// Case-insensitive substring evidence of each query term per field.
///
/// Looser than the TF-IDF match: a stemmed query term may score
/// a document without appearing verbatim in any field.
fn field_matches(doc: &Document, query_terms: &[String]) -> Vec<FieldMatch> {
    let tags = doc.joined_tags();
    let mut fields: Vec<(&str, &str)> = Vec::with_capacity(4 + doc.metadata.len());
    if let Some(title) = &doc.title {
        fields.push(("title", title));
    }
    fields.push(("content", &doc.content));
    if !tags.is_empty() {
        fields.push(("tags", &tags));
    }
    if let Some(category) = &doc.category {
        fields.push(("category", category));
    }
    fields.extend(doc.string_metadata());

    fields
        .into_iter()
        .filter_map(|(field, text)| {
            let haystack = text.to_lowercase();
            let mut terms: Vec<String> = Vec::new();
            for term in query_terms {
                let needle = term.to_lowercase();
                if haystack.contains(&needle) && !terms.contains(&needle) {
                    terms.push(needle);
                }
            }
            (!terms.is_empty()).then(|| FieldMatch {
                field: field.to_string(),
                terms,
            })
        })
        .collect()
}
