//! Inverted index mapping terms to the documents that contain them.

use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeMap, BTreeSet};

/// Set of document ids that contain a term.
pub type PostingSet = AHashSet<String>;

/// Term → posting set.
///
/// A term is present only while at least one document references it; the
/// last [`deindex`](Self::deindex) of a term removes its entry.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: AHashMap<String, PostingSet>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `doc_id` under every distinct term in `terms`.
    pub fn index<'a, I>(&mut self, doc_id: &str, terms: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for term in terms {
            if let Some(set) = self.postings.get_mut(term.as_str()) {
                set.insert(doc_id.to_string());
            } else {
                let mut set = PostingSet::default();
                set.insert(doc_id.to_string());
                self.postings.insert(term.clone(), set);
            }
        }
    }

    /// Removes `doc_id` from every posting set and prunes emptied terms.
    ///
    /// Returns the number of terms dropped from the index.
    pub fn deindex(&mut self, doc_id: &str) -> usize {
        let before = self.postings.len();
        self.postings.retain(|_, set| {
            set.remove(doc_id);
            !set.is_empty()
        });
        before - self.postings.len()
    }

    /// Posting set for `term`, if any document contains it.
    pub fn postings(&self, term: &str) -> Option<&PostingSet> {
        self.postings.get(term)
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |set| set.len())
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
    }

    /// Ordered copy of the whole index, for comparisons and diagnostics.
    pub fn snapshot(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.postings
            .iter()
            .map(|(term, set)| (term.clone(), set.iter().cloned().collect()))
            .collect()
    }
}
