//! TF-IDF relevance statistics.
//!
//! IDF uses `+1` smoothing on the document frequency. A term present in
//! (almost) every document therefore gets an IDF at or below zero, which
//! pushes ubiquitous terms down rather than up.

/// Share of `doc_terms` equal to `term`. An empty list scores 0.
pub fn term_frequency(term: &str, doc_terms: &[String]) -> f64 {
    if doc_terms.is_empty() {
        return 0.0;
    }
    let count = doc_terms.iter().filter(|t| *t == term).count();
    count as f64 / doc_terms.len() as f64
}

/// `ln(total_docs / (1 + docs_containing))`.
pub fn idf(total_docs: usize, docs_containing: usize) -> f64 {
    (total_docs as f64 / (1.0 + docs_containing as f64)).ln()
}

/// IDF of `term` computed directly from every document's term list.
pub fn inverse_document_frequency<'a, I>(term: &str, all_docs_terms: I) -> f64
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut total = 0;
    let mut containing = 0;
    for terms in all_docs_terms {
        total += 1;
        if terms.iter().any(|t| t == term) {
            containing += 1;
        }
    }
    idf(total, containing)
}

/// Combined TF-IDF weight of one term in one document.
pub fn tf_idf(term: &str, doc_terms: &[String], total_docs: usize, docs_containing: usize) -> f64 {
    term_frequency(term, doc_terms) * idf(total_docs, docs_containing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["a", "b", "a", "c"], "a", 0.5)]
    #[case(&["a", "b"], "z", 0.0)]
    #[case(&[], "a", 0.0)]
    fn test_term_frequency(#[case] doc: &[&str], #[case] term: &str, #[case] expected: f64) {
        check!(term_frequency(term, &terms(doc)) == expected);
    }

    #[test]
    fn test_idf_smoothing() {
        check!(idf(0, 0) == 0.0_f64.ln());
        check!(idf(9, 2) == 3.0_f64.ln());
        // universal term: ln(3 / 4) < 0
        check!(idf(3, 3) < 0.0);
        check!(idf(2, 1) == 0.0);
    }

    #[test]
    fn test_inverse_document_frequency_matches_counts() {
        let docs = [terms(&["wifi", "setup"]), terms(&["password"]), terms(&["printer"]), terms(&["scanner"])];
        let value = inverse_document_frequency("wifi", docs.iter().map(Vec::as_slice));
        check!(value == idf(4, 1));
    }

    #[test]
    fn test_tf_idf_product() {
        let doc = terms(&["wifi", "wifi", "router", "setup"]);
        check!(tf_idf("wifi", &doc, 10, 1) == 0.5 * 5.0_f64.ln());
    }
}
