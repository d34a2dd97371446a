//! Knowledge-base retrieval: category/tag boosting on top of [`SearchIndex`],
//! plus extraction of a query from free-form user notes.

use crate::config::{EngineConfig, KeywordRule, NoteKeywords, SearchDefaults};
use crate::document::Document;
use crate::search::{
    FieldWeights, SearchIndex, SearchOptions, SearchResult, TokenizeOptions, tokenize,
};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Number of most frequent note terms kept in the derived query.
const NOTE_QUERY_TERMS: usize = 10;
/// Multiplier for documents inside a requested category.
const CATEGORY_MATCH_BOOST: f64 = 1.5;
/// Multiplier for documents outside every requested category.
const CATEGORY_MISS_PENALTY: f64 = 0.5;
/// Multiplier for documents carrying none of the required tags.
const REQUIRED_TAG_MISS_PENALTY: f64 = 0.1;

/// Filters and limits for [`KnowledgeBaseFinder::find_relevant_entries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryOptions {
    pub limit: usize,
    pub min_score: f64,
    /// Preferred categories (soft filter).
    pub categories: Vec<String>,
    /// Tags every result must carry.
    pub required_tags: Vec<String>,
    /// Tags that raise a document's score when present.
    pub any_tags: Vec<String>,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self::from(SearchDefaults::default())
    }
}

impl From<SearchDefaults> for EntryOptions {
    fn from(defaults: SearchDefaults) -> Self {
        Self {
            limit: defaults.limit,
            min_score: defaults.min_score,
            categories: Vec::new(),
            required_tags: Vec::new(),
            any_tags: Vec::new(),
        }
    }
}

/// Query, categories and tags derived from user notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteQuery {
    pub query: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// Result of [`KnowledgeBaseFinder::find_matches_for_user_notes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteMatches<'a> {
    pub extracted: NoteQuery,
    pub results: Vec<SearchResult<'a>>,
}

/// A [`SearchIndex`] with external category and tag multipliers.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseFinder {
    index: SearchIndex,
    category_weights: AHashMap<String, f64>,
    tag_weights: AHashMap<String, f64>,
    keywords: NoteKeywords,
    defaults: SearchDefaults,
}

impl KnowledgeBaseFinder {
    pub fn new(weights: FieldWeights, options: TokenizeOptions) -> Self {
        Self {
            index: SearchIndex::new(weights, options),
            ..Self::default()
        }
    }

    /// Builds a finder from configuration and indexes `documents`.
    pub fn from_config<I>(config: &EngineConfig, documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut finder = Self::new(config.fields.clone(), config.tokenize.clone())
            .with_keywords(config.notes.clone())
            .with_defaults(config.search);
        finder.set_category_weights(config.category_weights.clone());
        finder.set_tag_weights(config.tag_weights.clone());
        finder.add_documents(documents);
        finder
    }

    pub fn with_keywords(mut self, keywords: NoteKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Default entry options (limit and minimum score from configuration).
    pub fn default_options(&self) -> EntryOptions {
        EntryOptions::from(self.defaults)
    }

    pub fn add_documents<I>(&mut self, documents: I)
    where
        I: IntoIterator<Item = Document>,
    {
        self.index.add_documents(documents);
    }

    pub fn add_document(&mut self, document: Document) {
        self.index.add_document(document);
    }

    pub fn remove_document(&mut self, id: &str) -> Option<Document> {
        self.index.remove_document(id)
    }

    /// Replaces all category multipliers.
    pub fn set_category_weights<I>(&mut self, weights: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        self.category_weights = weights.into_iter().collect();
        tracing::debug!("Category weights set for {} categories", self.category_weights.len());
    }

    /// Replaces all tag multipliers.
    pub fn set_tag_weights<I>(&mut self, weights: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        self.tag_weights = weights.into_iter().collect();
        tracing::debug!("Tag weights set for {} tags", self.tag_weights.len());
    }

    /// Searches with category/tag boosts, then drops results missing any
    /// required tag.
    ///
    /// Required tags are enforced twice: a 0.1 multiplier before ranking and a
    /// hard filter after it. Both stages affect which results survive the
    /// limit, so neither can be dropped without changing results.
    pub fn find_relevant_entries(&self, query: &str, options: &EntryOptions) -> Vec<SearchResult<'_>> {
        let boost: AHashMap<String, f64> = self
            .index
            .all_documents()
            .iter()
            .map(|doc| (doc.id.clone(), self.boost_for(doc, options)))
            .collect();

        let search_options = SearchOptions {
            limit: options.limit,
            min_score: options.min_score,
            boost,
        };

        let mut results = self.index.search(query, &search_options);
        if !options.required_tags.is_empty() {
            results.retain(|result| {
                options
                    .required_tags
                    .iter()
                    .all(|tag| result.document.has_tag(tag))
            });
        }
        results
    }

    /// Score multiplier for one document.
    fn boost_for(&self, doc: &Document, options: &EntryOptions) -> f64 {
        let mut boost = 1.0;

        if let Some(weight) = doc.category.as_ref().and_then(|c| self.category_weights.get(c)) {
            boost *= weight;
        }

        for tag in &doc.tags {
            if let Some(weight) = self.tag_weights.get(tag) {
                boost *= weight;
            }
        }

        if !options.categories.is_empty() {
            let listed = doc
                .category
                .as_ref()
                .is_some_and(|c| options.categories.contains(c));
            boost *= if listed {
                CATEGORY_MATCH_BOOST
            } else {
                CATEGORY_MISS_PENALTY
            };
        }

        if !options.required_tags.is_empty() {
            let matched = count_tags(doc, &options.required_tags);
            boost *= if matched == 0 {
                REQUIRED_TAG_MISS_PENALTY
            } else {
                1.0 + matched as f64 / options.required_tags.len() as f64
            };
        }

        if !options.any_tags.is_empty() {
            let matched = count_tags(doc, &options.any_tags);
            if matched > 0 {
                boost *= 1.0 + matched as f64 / options.any_tags.len() as f64;
            }
        }

        boost
    }

    /// Derives a search query, categories and tags from free-form notes.
    pub fn process_user_notes(&self, notes: &str) -> NoteQuery {
        let tokens = tokenize(notes, self.index.tokenize_options());

        // (term, count) in first-encounter order
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut positions: AHashMap<&str, usize> = AHashMap::new();
        for token in &tokens {
            if let Some(&position) = positions.get(token.as_str()) {
                counts[position].1 += 1;
            } else {
                positions.insert(token.as_str(), counts.len());
                counts.push((token.as_str(), 1));
            }
        }
        // stable: equal counts keep encounter order
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let query = counts
            .iter()
            .take(NOTE_QUERY_TERMS)
            .map(|(term, _)| *term)
            .collect::<Vec<_>>()
            .join(" ");

        let lowered = notes.to_lowercase();
        let labels = |rules: &[KeywordRule]| -> Vec<String> {
            rules
                .iter()
                .filter(|rule| rule.matches(&lowered))
                .map(|rule| rule.label.clone())
                .collect()
        };

        let extracted = NoteQuery {
            query,
            categories: labels(&self.keywords.categories),
            tags: labels(&self.keywords.tags),
        };
        tracing::debug!(
            "Extracted note query '{}' (categories: {:?}, tags: {:?})",
            extracted.query,
            extracted.categories,
            extracted.tags
        );
        extracted
    }

    /// Extracts a query from `notes` and runs it with the derived categories
    /// as a soft filter and the derived tags as optional boosts.
    pub fn find_matches_for_user_notes(&self, notes: &str, limit: usize, min_score: f64) -> NoteMatches<'_> {
        let extracted = self.process_user_notes(notes);
        let options = EntryOptions {
            limit,
            min_score,
            categories: extracted.categories.clone(),
            required_tags: Vec::new(),
            any_tags: extracted.tags.clone(),
        };
        let results = self.find_relevant_entries(&extracted.query, &options);
        NoteMatches { extracted, results }
    }
}

fn count_tags(doc: &Document, wanted: &[String]) -> usize {
    wanted.iter().filter(|tag| doc.has_tag(tag)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn finder() -> KnowledgeBaseFinder {
        let mut finder = KnowledgeBaseFinder::default();
        finder.add_documents([
            Document::new("vpn", "Connect the VPN client before opening the intranet")
                .with_title("VPN Access")
                .with_tags(["remote", "network"])
                .with_category("network"),
            Document::new("outage", "Network outage escalation for the intranet")
                .with_title("Outage Escalation")
                .with_tags(["urgent", "network"])
                .with_category("network"),
            Document::new("printer", "Clear a paper jam in the printer")
                .with_title("Printer Jam")
                .with_tags(["hardware"])
                .with_category("hardware"),
            Document::new("mail", "Recover deleted messages from your mailbox")
                .with_title("Mailbox Recovery")
                .with_category("email"),
        ]);
        finder
    }

    #[test]
    fn test_boost_compounds_tag_weights() {
        let mut finder = finder();
        finder.set_tag_weights([("urgent".to_string(), 2.0), ("network".to_string(), 1.5)]);
        finder.set_category_weights([("network".to_string(), 1.2)]);

        let doc = finder.index().document("outage").unwrap().clone();
        let boost = finder.boost_for(&doc, &EntryOptions::default());
        check!(boost == 1.0 * 1.2 * 2.0 * 1.5);
    }

    #[test]
    fn test_boost_soft_filters() {
        let finder = finder();
        let doc = finder.index().document("vpn").unwrap().clone();

        let in_category = EntryOptions {
            categories: vec!["network".into()],
            ..EntryOptions::default()
        };
        check!(finder.boost_for(&doc, &in_category) == 1.5);

        let other_category = EntryOptions {
            categories: vec!["email".into()],
            ..EntryOptions::default()
        };
        check!(finder.boost_for(&doc, &other_category) == 0.5);

        let required_missing = EntryOptions {
            required_tags: vec!["urgent".into()],
            ..EntryOptions::default()
        };
        check!(finder.boost_for(&doc, &required_missing) == 0.1);

        let any_half = EntryOptions {
            any_tags: vec!["remote".into(), "mobile".into()],
            ..EntryOptions::default()
        };
        check!(finder.boost_for(&doc, &any_half) == 1.5);
    }

    #[test]
    fn test_required_tags_hard_filter() {
        let finder = finder();
        let options = EntryOptions {
            min_score: 0.0,
            required_tags: vec!["urgent".into()],
            ..EntryOptions::default()
        };
        let results = finder.find_relevant_entries("intranet network", &options);

        check!(!results.is_empty());
        check!(results.iter().all(|r| r.document.has_tag("urgent")));
    }

    #[test]
    fn test_process_user_notes_extracts_query_and_labels() {
        let finder = finder();
        let notes = "URGENT: the VPN keeps dropping. VPN reconnects, then the network drops again.";
        let extracted = finder.process_user_notes(notes);

        // "vpn" appears twice; the rest keep encounter order
        check!(extracted.query.starts_with("vpn urgent keep dropp"));
        check!(extracted.categories == vec!["network".to_string()]);
        check!(extracted.tags == vec!["urgent".to_string(), "remote".to_string()]);
    }

    #[test]
    fn test_note_query_keeps_ten_terms() {
        let finder = finder();
        let notes = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let extracted = finder.process_user_notes(notes);
        check!(extracted.query.split(' ').count() == NOTE_QUERY_TERMS);
        check!(extracted.query.starts_with("alpha bravo"));
        check!(!extracted.query.contains("kilo"));
    }

    #[test]
    fn test_find_matches_for_user_notes() {
        let finder = finder();
        let matches = finder.find_matches_for_user_notes("printer jam again, paper stuck in the printer", 5, 0.0);

        check!(matches.extracted.categories.contains(&"hardware".to_string()));
        check!(matches.results.first().map(|r| r.document.id.as_str()) == Some("printer"));
    }
}
