//! Supplement selection: one extra snippet that does not repeat the primary answer.

use std::borrow::Borrow;

use knowledge_store::Document;

use crate::faq::{extract_faq_pairs, is_faq_content};
use crate::text::{is_stop_word, take_chars};

/// Candidates more similar than this to the primary text are skipped.
pub const MAX_SUPPLEMENT_SIMILARITY: f64 = 0.7;
/// FAQ answers at or above this similarity are not used as snippets.
const MAX_SNIPPET_SIMILARITY: f64 = 0.5;
const WHOLE_CONTENT_LIMIT: usize = 200;
const TRUNCATED_LEN: usize = 150;

fn filtered_words(text: &str) -> Vec<String> {
    crate::text::words(text)
        .into_iter()
        .filter(|w| w.len() > 2 && !is_stop_word(w))
        .collect()
}

/// Word-overlap similarity in `[0, 1]`.
///
/// Counts the filtered words of `a` that also occur in `b`, divided by the
/// longer word list. Zero when either side has no words.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let wa = filtered_words(a);
    let wb = filtered_words(b);
    if wa.is_empty() || wb.is_empty() {
        return 0.0;
    }
    let common = wa.iter().filter(|w| wb.contains(w)).count();
    common as f64 / wa.len().max(wb.len()) as f64
}

/// Picks a supplement for `primary` from `candidates`, in order.
///
/// The first candidate is skipped when it already contains `primary`.
pub fn pick_supplement<D: Borrow<Document>>(candidates: &[D], primary: &str) -> Option<String> {
    if candidates.len() <= 1 {
        return None;
    }
    let start = usize::from(candidates[0].borrow().content.contains(primary));

    candidates[start..]
        .iter()
        .map(|c| c.borrow().content.as_str())
        .find(|content| text_similarity(content, primary) <= MAX_SUPPLEMENT_SIMILARITY)
        .map(|content| snippet(content, primary))
        .filter(|s| !s.is_empty())
}

fn snippet(content: &str, primary: &str) -> String {
    if content.chars().count() < WHOLE_CONTENT_LIMIT {
        return content.to_string();
    }
    if is_faq_content(content) {
        if let Some(pair) = extract_faq_pairs(content)
            .into_iter()
            .find(|p| text_similarity(&p.answer, primary) < MAX_SNIPPET_SIMILARITY)
        {
            return format!("{}\n{}", pair.question, pair.answer);
        }
    }
    format!("{}...", take_chars(content, TRUNCATED_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str) -> Document {
        Document::new(id, format!("Doc {id}"), content)
    }

    #[test]
    fn similarity_is_overlap_over_longer_side() {
        assert_eq!(text_similarity("refund policy", "refund policy"), 1.0);
        assert_eq!(text_similarity("refund policy details", "refund"), 1.0 / 3.0);
        assert_eq!(text_similarity("the and", "refund"), 0.0);
        assert_eq!(text_similarity("", "refund"), 0.0);
    }

    #[test]
    fn single_candidate_has_no_supplement() {
        assert_eq!(pick_supplement(&[doc("1", "anything")], "primary"), None);
    }

    #[test]
    fn skips_first_candidate_containing_primary() {
        let docs = vec![
            doc("1", "Refunds take five days. Contact billing."),
            doc("2", "Shipping takes two weeks."),
        ];
        let got = pick_supplement(&docs, "Refunds take five days.");
        assert_eq!(got.as_deref(), Some("Shipping takes two weeks."));
    }

    #[test]
    fn never_returns_a_near_duplicate() {
        let primary = "Refunds are processed within five business days";
        let docs = vec![
            doc("1", "unrelated primary holder"),
            doc("2", "Refunds are processed within five business days!"),
            doc("3", "Invoices are emailed monthly"),
        ];
        let got = pick_supplement(&docs, primary).expect("supplement");
        assert!(text_similarity(&got, primary) <= MAX_SUPPLEMENT_SIMILARITY);
        // The first candidate does not contain the primary text, so it is eligible.
        assert_eq!(got, "unrelated primary holder");
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "word ".repeat(100);
        let docs = vec![doc("1", "primary text"), doc("2", &long)];
        let got = pick_supplement(&docs, "primary text").expect("supplement");
        assert!(got.ends_with("..."));
        assert_eq!(got.chars().count(), TRUNCATED_LEN + 3);
    }

    #[test]
    fn long_faq_yields_first_novel_pair() {
        let filler = "x".repeat(200);
        let faq = format!(
            "Q: How long do refunds take?\nA: Refunds are processed within five business days.\n\
             Q: Do you ship abroad?\nA: Yes, to most countries. {filler}"
        );
        let docs = vec![doc("1", "Refunds are processed within five business days."), doc("2", &faq)];
        let got = pick_supplement(&docs, "Refunds are processed within five business days.")
            .expect("supplement");
        assert!(got.starts_with("Do you ship abroad?\nYes, to most countries."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(300);
        let docs = vec![doc("1", "primary"), doc("2", &long)];
        let got = pick_supplement(&docs, "primary").expect("supplement");
        assert_eq!(got, format!("{}...", "é".repeat(150)));
    }
}
