//! Keyword extraction: lowercase tokenization with stop-word and length filtering.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// A token starts with a letter and continues through letters, digits and
/// `+ # . / -`. Both ends must sit on a word boundary, so trailing symbols are
/// dropped (`c++` yields `c`) while interior ones survive (`node.js`, `ci/cd`,
/// `cross-functional`).
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z][a-zA-Z0-9+#./-]*\b").expect("token pattern is valid"));

/// Function words excluded from keyword extraction.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Tokens this short or shorter are discarded.
const MAX_DISCARDED_LEN: usize = 2;

/// Extracts candidate keywords from free text.
///
/// Returns tokens in order of occurrence with duplicates retained, so callers
/// can count frequencies. No stemming or synonym expansion is applied.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !STOP_WORD_SET.contains(token))
        .filter(|token| token.chars().count() > MAX_DISCARDED_LEN)
        .map(str::to_string)
        .collect()
}

/// Distinct keywords of `text`, for set-overlap comparisons.
pub fn keyword_set(text: &str) -> HashSet<String> {
    extract_keywords(text).into_iter().collect()
}

/// Counts keyword frequencies and returns the `limit` most frequent distinct
/// keywords, highest count first. Ties keep first-occurrence order.
pub fn top_keywords(keywords: &[String], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();

    for keyword in keywords {
        match positions.get(keyword.as_str()) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(keyword.as_str(), counts.len());
                counts.push((keyword.clone(), 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_drops_stop_words() {
        let keywords = extract_keywords("The Python developer and the AWS engineer");
        assert_eq!(keywords, vec!["python", "developer", "aws", "engineer"]);
    }

    #[test]
    fn test_drops_tokens_of_two_chars_or_fewer() {
        let keywords = extract_keywords("go ml ai rust sql");
        assert_eq!(keywords, vec!["rust", "sql"]);
    }

    #[test]
    fn test_keeps_interior_symbols() {
        let keywords = extract_keywords("Node.js, CI/CD and cross-functional C# teams");
        assert_eq!(
            keywords,
            vec!["node.js", "ci/cd", "cross-functional", "teams"]
        );
    }

    #[test]
    fn test_slash_does_not_split_tokens() {
        // Matches the scorer's long-standing token class: "ci/cd" is one keyword,
        // so a resume listing "CI" and "CD" separately does not match it.
        assert_eq!(extract_keywords("CI/CD pipelines"), vec!["ci/cd", "pipelines"]);
        assert_eq!(extract_keywords("front/back end"), vec!["front/back", "end"]);
        assert!(!extract_keywords("CI and CD").contains(&"ci/cd".to_string()));
    }

    #[test]
    fn test_trailing_symbols_are_not_part_of_token() {
        // "c++" collapses to "c" (then filtered by length); "end." loses the period
        let keywords = extract_keywords("Expert in C++ until the end.");
        assert_eq!(keywords, vec!["expert", "until", "end"]);
    }

    #[test]
    fn test_tokens_must_start_with_a_letter() {
        let keywords = extract_keywords("5years 2024 k8s");
        assert_eq!(keywords, vec!["k8s"]);
    }

    #[test]
    fn test_duplicates_are_retained_in_order() {
        let keywords = extract_keywords("Rust rust RUST python");
        assert_eq!(keywords, vec!["rust", "rust", "rust", "python"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("  \n\t ").is_empty());
    }

    #[test]
    fn test_stop_word_list_is_fully_enumerated() {
        let expected: HashSet<&str> = [
            "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
            "by", "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had",
            "do", "does", "did", "will", "would", "could", "should", "may", "might", "must",
            "can", "this", "that",
        ]
        .into_iter()
        .collect();
        assert_eq!(STOP_WORDS.len(), 38);
        assert_eq!(*STOP_WORD_SET, expected);
    }

    #[test]
    fn test_top_keywords_orders_by_count_then_first_occurrence() {
        let keywords: Vec<String> = ["docker", "python", "aws", "python", "aws", "kafka"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let top = top_keywords(&keywords, 30);
        assert_eq!(
            top,
            vec![
                ("python".to_string(), 2),
                ("aws".to_string(), 2),
                ("docker".to_string(), 1),
                ("kafka".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_keywords_truncates_to_limit() {
        let keywords: Vec<String> = (0..50).map(|i| format!("kw{i}")).collect();
        assert_eq!(top_keywords(&keywords, 30).len(), 30);
    }

    #[test]
    fn test_keyword_set_deduplicates() {
        let set = keyword_set("rust Rust RUST tokio");
        assert_eq!(set.len(), 2);
        assert!(set.contains("rust"));
        assert!(set.contains("tokio"));
    }
}
