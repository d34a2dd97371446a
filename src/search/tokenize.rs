//! Text tokenization and stemming utilities for search indexing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "if",
    "in", "into", "is", "it", "no", "not", "of", "on", "or", "such", "that", "the", "their",
    "then", "there", "these", "they", "this", "to", "was", "with",
];

/// Matches any character that is neither a word character nor whitespace.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"));

/// Suffix rewrites applied by [`stem`], in order.
const SUFFIX_RULES: &[(&str, &str)] = &[("ies", "i"), ("es", "e"), ("s", ""), ("ing", ""), ("ed", "")];

/// Normalization switches shared by every document and query of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizeOptions {
    pub lowercase: bool,
    pub remove_stop_words: bool,
    pub stemming: bool,
    pub remove_punctuation: bool,
    /// Minimum token length in characters. Values below 1 behave as 1.
    pub min_token_length: usize,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stop_words: true,
            stemming: true,
            remove_punctuation: true,
            min_token_length: 2,
        }
    }
}

impl TokenizeOptions {
    /// Same options with stemming turned off (used for literal token matching).
    pub fn without_stemming(&self) -> Self {
        Self {
            stemming: false,
            ..self.clone()
        }
    }
}

/// Tokenizes text into index terms.
///
/// Steps run in a fixed order: lowercase, punctuation to spaces, whitespace
/// split, length filter, stop-word filter, stemming. The length filter sees
/// the unstemmed token, so stemming can still yield short or empty terms.
pub fn tokenize(text: &str, options: &TokenizeOptions) -> Vec<String> {
    let mut normalized = if options.lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    if options.remove_punctuation {
        normalized = PUNCTUATION.replace_all(&normalized, " ").into_owned();
    }

    let min_len = options.min_token_length.max(1);

    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() >= min_len)
        .filter(|token| !(options.remove_stop_words && is_stop_word(token)))
        .map(|token| {
            if options.stemming {
                stem(token)
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// Whether `token` is in the fixed stop-word list (exact, case-sensitive).
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Simplified suffix-stripping stemmer.
///
/// Each rule fires at most once, in order, against the output of the previous
/// rule. The chain is not iterated, so `"boxes"` becomes `"boxe"`
/// and `"series"` becomes `"seri"`.
pub fn stem(token: &str) -> String {
    let mut word = token.to_string();
    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stripped) = word.strip_suffix(suffix) {
            word = format!("{stripped}{replacement}");
        }
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("boxes", "boxe")]
    #[case("series", "seri")]
    #[case("parties", "parti")]
    #[case("cats", "cat")]
    #[case("running", "runn")]
    #[case("jumped", "jump")]
    #[case("glass", "glas")]
    #[case("settings", "sett")] // "s" then "ing" both fire
    #[case("tree", "tree")]
    fn test_stem_suffix_chain(#[case] input: &str, #[case] expected: &str) {
        check!(stem(input) == expected);
    }

    #[test]
    fn test_stemming_is_not_idempotent() {
        let options = TokenizeOptions::default();
        let once = tokenize("boxes", &options);
        check!(once == owned(&["boxe"]));

        // "dressed" loses "ed", and the result still ends in "s"
        let first = tokenize("dressed", &options);
        let second = tokenize(&first.join(" "), &options);
        check!(first == owned(&["dress"]));
        check!(second == owned(&["dres"]));
    }

    #[rstest]
    #[case("The quick brown fox", &["quick", "brown", "fox"])]
    #[case("Hello, World!", &["hello", "world"])]
    #[case("reset-password now", &["reset", "password", "now"])]
    #[case("this is it", &[])]
    fn test_tokenize_without_stemming(#[case] input: &str, #[case] expected: &[&str]) {
        let options = TokenizeOptions::default().without_stemming();
        check!(tokenize(input, &options) == owned(expected));
    }

    #[test]
    fn test_min_length_applies_before_stemming() {
        let options = TokenizeOptions {
            min_token_length: 3,
            ..TokenizeOptions::default()
        };
        // "is" is too short; "ing" passes the length check and stems to ""
        check!(tokenize("ab is ing", &options) == owned(&[""]));
    }

    #[test]
    fn test_options_disabled_keeps_raw_tokens() {
        let options = TokenizeOptions {
            lowercase: false,
            remove_stop_words: false,
            stemming: false,
            remove_punctuation: false,
            min_token_length: 1,
        };
        check!(tokenize("The Cat's toys", &options) == owned(&["The", "Cat's", "toys"]));
    }

    #[test]
    fn test_stop_words_are_case_sensitive_after_lowercasing_disabled() {
        let options = TokenizeOptions {
            lowercase: false,
            stemming: false,
            ..TokenizeOptions::default()
        };
        check!(tokenize("The the", &options) == owned(&["The"]));
    }

    #[test]
    fn test_unstemmed_output_is_idempotent() {
        let options = TokenizeOptions::default().without_stemming();
        let first = tokenize("Configure your wireless network, quickly!", &options);
        let second = tokenize(&first.join(" "), &options);
        check!(first == second);
    }

    #[rstest]
    #[case("Москва")]
    #[case("日本")]
    #[case("🦀")]
    fn test_unicode_handling(#[case] input: &str) {
        // Should not panic, even if it produces empty results
        let _tokens = tokenize(input, &TokenizeOptions::default());
    }

    #[test]
    fn test_empty_and_whitespace() {
        let options = TokenizeOptions::default();
        check!(tokenize("", &options).is_empty());
        check!(tokenize("   ", &options).is_empty());
        check!(tokenize("\n\t", &options).is_empty());
    }

    #[test]
    fn test_stop_word_list_size() {
        check!(STOP_WORDS.len() == 35);
    }
}
