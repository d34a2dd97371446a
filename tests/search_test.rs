mod common;

use assert2::{check, let_assert};
use common::{helpdesk_finder, helpdesk_documents};
use kb_search::{
    Document, EntryOptions, KnowledgeBaseFinder, SearchError, SearchIndex, SearchOptions,
    SimilarOptions, TokenizeOptions, edit_distance, similarity, tokenize,
};
use rstest::rstest;

fn index_with(documents: Vec<Document>) -> SearchIndex {
    let mut index = SearchIndex::default();
    index.add_documents(documents);
    index
}

fn ids(results: &[kb_search::SearchResult<'_>]) -> Vec<String> {
    results.iter().map(|r| r.document.id.clone()).collect()
}

// --- End-to-end helpdesk scenario ---

/// Test: "password" finds only the password reset article.
#[test]
fn password_query_returns_only_reset_article() {
    let index = index_with(helpdesk_documents());
    let results = index.search("password", &SearchOptions::default());

    check!(ids(&results) == vec!["1".to_string()]);
    check!(results[0].score > 0.0);
}

/// Test: "account" ranks the reset article first and never surfaces the WiFi
/// article with a match.
#[test]
fn account_query_ranks_reset_article_first() {
    let index = index_with(helpdesk_documents());
    let results = index.search("account", &SearchOptions::default());

    let_assert!(Some(first) = results.first());
    check!(first.document.id == "1");
    check!(
        results
            .iter()
            .filter(|r| r.document.id == "2")
            .all(|r| r.matches.is_empty())
    );
}

/// Test: with exactly two documents a term found in one of them has
/// idf = ln(2 / 2) = 0, so nothing clears a positive minimum score.
#[test]
fn two_document_corpus_has_zero_idf() {
    let index = index_with(helpdesk_documents().into_iter().take(2).collect());
    let options = SearchOptions {
        min_score: f64::MIN_POSITIVE,
        ..SearchOptions::default()
    };
    check!(index.search("password", &options).is_empty());
}

// --- Ranking properties ---

/// Test: a title match outranks a content-only match for the same term.
#[test]
fn title_match_outranks_content_match() {
    let index = index_with(vec![
        Document::new("content-only", "printer").with_title("Paper Jam"),
        Document::new("titled", "paper jam").with_title("Printer"),
        Document::new("mail", "recover deleted messages").with_title("Mailbox"),
        Document::new("monitor", "adjust the brightness").with_title("Monitor"),
    ]);
    let options = SearchOptions {
        min_score: 0.0,
        ..SearchOptions::default()
    };
    let results = index.search("printer", &options);

    check!(ids(&results) == vec!["titled".to_string(), "content-only".to_string()]);
    check!(results[0].score > results[1].score);
}

#[rstest]
#[case("network")]
#[case("security urgent")]
#[case("reset the password now")]
fn scores_are_sorted_and_above_minimum(#[case] query: &str) {
    let index = index_with(helpdesk_documents());
    let options = SearchOptions {
        min_score: 0.05,
        ..SearchOptions::default()
    };
    let results = index.search(query, &options);

    check!(results.iter().all(|r| r.score >= 0.05));
    check!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("the and of")]
fn queries_without_terms_return_nothing(#[case] query: &str) {
    let index = index_with(helpdesk_documents());
    check!(index.search(query, &SearchOptions::default()).is_empty());
}

// --- Index maintenance ---

/// Test: adding then removing a document restores the inverted index, and
/// incremental maintenance matches a full rebuild.
#[test]
fn add_remove_restores_index() {
    let mut index = index_with(helpdesk_documents());
    let before = index.inverted_index().snapshot();

    index.add_document(
        Document::new("laptop", "Dock the laptop and update the firmware")
            .with_title("Laptop Dock")
            .with_tags(["hardware"]),
    );
    check!(index.inverted_index().contains_term("firmware"));

    let removed = index.remove_document("laptop");
    check!(removed.map(|d| d.id) == Some("laptop".to_string()));
    check!(index.inverted_index().snapshot() == before);

    let mut rebuilt = index.clone();
    rebuilt.rebuild_index();
    check!(rebuilt.inverted_index().snapshot() == before);
}

#[test]
fn find_similar_unknown_id_is_not_found() {
    let index = index_with(helpdesk_documents());
    let result = index.find_similar_documents("missing", &SimilarOptions::default());
    let_assert!(Err(SearchError::NotFound { id }) = result);
    check!(id == "missing");
}

#[test]
fn find_similar_excludes_source_document() {
    let index = index_with(helpdesk_documents());
    let options = SimilarOptions {
        min_score: 0.0,
        ..SimilarOptions::default()
    };
    let results = index.find_similar_documents("outage", &options).unwrap();

    check!(!results.is_empty());
    check!(results.iter().all(|r| r.document.id != "outage"));
    check!(results.len() <= options.limit);
}

// --- Knowledge base ---

/// Test: required tags remove untagged results even when they score well.
#[rstest]
fn required_tags_exclude_untagged_results(helpdesk_finder: KnowledgeBaseFinder) {
    let open = EntryOptions {
        min_score: 0.0,
        ..EntryOptions::default()
    };
    let unfiltered = helpdesk_finder.find_relevant_entries("network", &open);
    check!(ids(&unfiltered).contains(&"2".to_string()));

    let urgent_only = EntryOptions {
        required_tags: vec!["urgent".to_string()],
        ..open
    };
    let results = helpdesk_finder.find_relevant_entries("network", &urgent_only);

    check!(ids(&results) == vec!["outage".to_string()]);
    check!(results.iter().all(|r| r.document.has_tag("urgent")));
}

#[rstest]
fn preferred_category_lifts_matching_documents(helpdesk_finder: KnowledgeBaseFinder) {
    let options = EntryOptions {
        min_score: 0.0,
        categories: vec!["security".to_string()],
        ..EntryOptions::default()
    };
    let results = helpdesk_finder.find_relevant_entries("security", &options);
    check!(results.first().map(|r| r.document.id.as_str()) == Some("phishing"));
}

// --- Text utilities ---

#[test]
fn stemming_is_not_idempotent() {
    let options = TokenizeOptions::default();
    check!(tokenize("boxes", &options) == vec!["boxe".to_string()]);
    check!(tokenize("boxe", &options) == vec!["boxe".to_string()]);
}

#[rstest]
#[case("kitten", "sitting", 3)]
#[case("password", "pasword", 1)]
#[case("", "", 0)]
fn edit_distance_cases(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
    check!(edit_distance(a, b) == expected);
    check!(edit_distance(b, a) == expected);
}

#[test]
fn similarity_edges() {
    check!(similarity("wifi", "wifi") == 1.0);
    check!(similarity("", "x") == 0.0);
}
