//! Text normalization helpers shared by the analyzers

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn price_noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d.]").expect("valid price regex"))
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"))
}

/// Collapse whitespace runs into single spaces and trim
pub fn clean_text(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}

/// Parse a scraped price string such as "$1,299.99" or "₹ 549".
/// Returns 0.0 when nothing numeric remains.
pub fn parse_price(raw: &str) -> f64 {
    let cleaned = price_noise_re().replace_all(raw, "");
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Split pasted text into one review per non-empty line
pub fn split_reviews(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lower-cased word tokens of two or more word characters
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_re()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Common English stop words, dropped before term weighting
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "also", "am", "an",
    "and", "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "done",
    "down", "during", "each", "either", "else", "ever", "every", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself",
    "just", "me", "more", "most", "much", "must", "my", "myself", "neither", "no", "nor",
    "not", "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "thing", "this", "those", "through", "thus", "to", "too", "under", "until", "up", "upon",
    "us", "very", "was", "we", "well", "were", "what", "when", "where", "whether", "which",
    "while", "who", "whom", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  great \t\n value  "), "great value");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_parse_price_strips_currency() {
        assert_eq!(parse_price("$1,299.99"), 1299.99);
        assert_eq!(parse_price("₹ 549"), 549.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("free"), 0.0);
        // Two decimal points cannot be parsed
        assert_eq!(parse_price("1.2.3"), 0.0);
    }

    #[test]
    fn test_split_reviews_drops_blank_lines() {
        let reviews = split_reviews("Great!\n\n   \n  Broke in a week  \n");
        assert_eq!(reviews, vec!["Great!", "Broke in a week"]);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("wow amazing five stars"), 4);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_tokenize_skips_single_chars() {
        assert_eq!(tokenize("I love it, 5 stars!"), vec!["love", "it", "stars"]);
    }

    #[test]
    fn test_stop_words_sorted_for_lookup() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("quality"));
    }
}
