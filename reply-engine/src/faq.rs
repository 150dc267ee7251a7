//! `Q:` / `A:` pair extraction and query matching.
//!
//! The scanner walks the content once. A `Q:` marker always starts a new
//! segment and flushes the previous one; the first `A:` inside a segment
//! switches it to the answer. Segments that never see an `A:` and pairs with
//! an empty side are dropped without error.

use knowledge_store::Document;
use tracing::debug;

use crate::text::{extract_phrases, is_stop_word, words};

const QUESTION_MARK: &[u8] = b"Q:";
const ANSWER_MARK: &[u8] = b"A:";

const COVERAGE_WEIGHT: f64 = 2.0;
const PHRASE_WEIGHT: f64 = 1.5;

/// One question/answer pair, both sides trimmed and non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqPair {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredFaqPair {
    pub pair: FaqPair,
    pub score: f64,
}

/// `true` when `text` carries both markers.
pub fn is_faq_content(text: &str) -> bool {
    text.contains("Q:") && text.contains("A:")
}

#[derive(Clone, Copy, Debug)]
enum ScanState {
    /// Text before the first `Q:`.
    Preamble,
    Question { start: usize },
    Answer { question: (usize, usize), start: usize },
}

/// Extracts every well-formed pair in document order.
pub fn extract_faq_pairs(text: &str) -> Vec<FaqPair> {
    let bytes = text.as_bytes();
    let mut pairs = Vec::new();
    let mut state = ScanState::Preamble;
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(QUESTION_MARK) {
            flush(text, state, i, &mut pairs);
            state = ScanState::Question {
                start: i + QUESTION_MARK.len(),
            };
            i += QUESTION_MARK.len();
        } else if rest.starts_with(ANSWER_MARK) {
            match state {
                ScanState::Question { start } => {
                    state = ScanState::Answer {
                        question: (start, i),
                        start: i + ANSWER_MARK.len(),
                    };
                }
                ScanState::Preamble => debug!(offset = i, "answer marker before any question"),
                ScanState::Answer { .. } => {}
            }
            i += ANSWER_MARK.len();
        } else {
            i += 1;
        }
    }
    flush(text, state, bytes.len(), &mut pairs);

    pairs
}

fn flush(text: &str, state: ScanState, end: usize, out: &mut Vec<FaqPair>) {
    match state {
        ScanState::Preamble => {}
        ScanState::Question { start } => {
            debug!(offset = start, "question without answer dropped");
        }
        ScanState::Answer {
            question: (qs, qe),
            start,
        } => {
            let question = text[qs..qe].trim();
            let answer = text[start..end].trim();
            if question.is_empty() || answer.is_empty() {
                debug!(offset = qs, "pair with an empty side dropped");
                return;
            }
            out.push(FaqPair {
                question: question.to_string(),
                answer: answer.to_string(),
            });
        }
    }
}

/// Query-side inputs reused for every pair.
struct QueryTerms<'a> {
    keywords: &'a [String],
    phrases: Vec<String>,
}

impl<'a> QueryTerms<'a> {
    fn new(query_lower: &str, keywords: &'a [String]) -> Self {
        Self {
            keywords,
            phrases: extract_phrases(query_lower, 2),
        }
    }

    fn score(&self, pair: &FaqPair) -> f64 {
        let question_lower = pair.question.to_lowercase();
        let question_words: Vec<String> = words(&question_lower)
            .into_iter()
            .filter(|w| w.len() > 2 && !is_stop_word(w))
            .collect();

        let common = self
            .keywords
            .iter()
            .filter(|k| question_words.contains(k))
            .count();
        let coverage = if self.keywords.is_empty() {
            0.0
        } else {
            common as f64 / self.keywords.len() as f64
        };

        let question_phrases = extract_phrases(&question_lower, 2);
        let shared_phrases = self
            .phrases
            .iter()
            .filter(|p| question_phrases.contains(p))
            .count();

        common as f64 + COVERAGE_WEIGHT * coverage + PHRASE_WEIGHT * shared_phrases as f64
    }
}

/// Match score of one pair against the query.
///
/// Keyword hits in the question, plus twice the keyword coverage, plus 1.5
/// per shared two-word phrase.
pub fn score_pair(pair: &FaqPair, query_lower: &str, keywords: &[String]) -> f64 {
    QueryTerms::new(query_lower, keywords).score(pair)
}

/// Best-scoring pair across all FAQ-shaped documents of the pool.
///
/// Only a strictly higher score replaces the current best, so the first of
/// equal pairs wins and a zero score never matches.
pub fn best_faq_match(
    documents: &[Document],
    query_lower: &str,
    keywords: &[String],
) -> Option<ScoredFaqPair> {
    let terms = QueryTerms::new(query_lower, keywords);
    let mut best: Option<ScoredFaqPair> = None;
    let mut best_score = 0.0;

    for doc in documents.iter().filter(|d| is_faq_content(&d.content)) {
        for pair in extract_faq_pairs(&doc.content) {
            let score = terms.score(&pair);
            debug!(document = %doc.name, question = %pair.question, score, "faq pair scored");
            if score > best_score {
                best_score = score;
                best = Some(ScoredFaqPair { pair, score });
            }
        }
    }
    best
}

/// Acceptance bar: `max(1.5, min(0.4 * keyword_count, 3))`.
pub fn faq_threshold(keyword_count: usize) -> f64 {
    (0.4 * keyword_count as f64).min(3.0).max(1.5)
}

pub fn accepts(candidate: &ScoredFaqPair, keyword_count: usize) -> bool {
    candidate.score >= faq_threshold(keyword_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::extract_keywords;

    const SAMPLE: &str = "Q: What is X?\nA: X is Y.\nQ: How?\nA: Like this.";

    #[test]
    fn two_pairs_without_leaking_markers() {
        let pairs = extract_faq_pairs(SAMPLE);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "What is X?");
        assert_eq!(pairs[0].answer, "X is Y.");
        assert_eq!(pairs[1].question, "How?");
        assert_eq!(pairs[1].answer, "Like this.");
        assert!(pairs.iter().all(|p| !p.answer.contains("Q:")));
    }

    #[test]
    fn unmatched_markers_are_skipped() {
        let text = "Intro A: stray\nQ: No answer here\nQ: Real?\nA: Yes.\nQ:\nA: orphan answer";
        let pairs = extract_faq_pairs(text);
        assert_eq!(
            pairs,
            vec![FaqPair {
                question: "Real?".into(),
                answer: "Yes.".into()
            }]
        );
    }

    #[test]
    fn later_answer_markers_stay_in_the_answer() {
        let pairs = extract_faq_pairs("Q: Plans?\nA: Basic.\nA: Pro.");
        assert_eq!(pairs[0].answer, "Basic.\nA: Pro.");
    }

    #[test]
    fn plain_text_has_no_pairs() {
        assert!(!is_faq_content("Just a policy text."));
        assert!(extract_faq_pairs("Just a policy text.").is_empty());
    }

    #[test]
    fn threshold_is_floored_and_capped() {
        assert_eq!(faq_threshold(10), 3.0);
        assert_eq!(faq_threshold(2), 1.5);
        assert_eq!(faq_threshold(0), 1.5);
        assert!((faq_threshold(6) - 2.4).abs() < 1e-9);
    }

    #[test]
    fn refund_question_beats_pricing_question() {
        let doc = Document::new(
            "1",
            "Billing FAQ",
            "Q: How do I get a refund?\nA: Refunds are processed within 5 business days.\n\n\
             Q: What is your pricing?\nA: Plans start at $9.99/month.",
        );
        let query = "refund request i want a refund for last month";
        let kws = extract_keywords(query);
        let best = best_faq_match(&[doc], query, &kws).expect("match");
        assert_eq!(best.pair.answer, "Refunds are processed within 5 business days.");
        // Two keyword hits ("refund" twice) plus 2 * 2/6 coverage.
        assert!((best.score - (2.0 + 2.0 / 3.0)).abs() < 1e-9);
        assert!(accepts(&best, kws.len()));
    }

    #[test]
    fn shared_phrases_add_weight() {
        let pair = FaqPair {
            question: "How do I reset password?".into(),
            answer: "Use the link.".into(),
        };
        let query = "reset password please";
        let kws = extract_keywords(query);
        // "reset", "password" hit; coverage 2/3; "reset password" shared.
        let expected = 2.0 + 2.0 * (2.0 / 3.0) + 1.5;
        assert!((score_pair(&pair, query, &kws) - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_scores_never_match() {
        let doc = Document::new("1", "FAQ", "Q: Shipping?\nA: Two days.");
        let kws = extract_keywords("invoice");
        assert!(best_faq_match(&[doc], "invoice", &kws).is_none());
    }
}
