//! Tokenizer and keyword extraction shared by every scoring stage.

/// Function words ignored by keyword extraction and text similarity.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "for", "with", "about", "from", "to", "in", "on", "at", "by", "an",
    "a", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "shall", "should", "may", "might", "must", "can", "could",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase words split on runs of non-word characters (`[^A-Za-z0-9_]+`).
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Words longer than two characters that are not stop words.
///
/// Order and duplicates are kept: the keyword count drives the FAQ
/// acceptance threshold and repeated words count twice in coverage.
pub fn extract_keywords(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| w.len() > 2 && !is_stop_word(w))
        .collect()
}

/// Sliding `n`-word windows over words longer than two characters.
///
/// Stop words are kept here; phrases are compared as literal strings.
pub fn extract_phrases(text: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    let ws: Vec<String> = words(text).into_iter().filter(|w| w.len() > 2).collect();
    ws.windows(n).map(|w| w.join(" ")).collect()
}

/// Non-overlapping, case-insensitive substring count.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(&needle.to_lowercase()).count()
}

/// `true` if the lowercase `text` contains any of `needles`.
pub fn contains_any(text_lower: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text_lower.contains(n))
}

/// Longest prefix of `s` with at most `max` characters.
pub fn take_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
