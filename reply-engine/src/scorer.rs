//! Bag-of-substrings document ranking.
//!
//! No length normalization is applied: long documents collect frequency
//! bonuses and rank higher. Tuning should keep that skew in mind.

use knowledge_store::Document;

use crate::text::{count_occurrences, words};

/// Size of the candidate pool kept after scoring.
pub const TOP_DOCUMENTS: usize = 5;

const NAME_MATCH_BONUS: f64 = 2.0;
const MAX_REPEAT_BONUS: usize = 3;
const PARTIAL_MATCH_BONUS: f64 = 0.5;
const HELP_NAME_BONUS: f64 = 1.5;

/// A document with its relevance score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Score of one document against the query keywords.
pub fn score_document(doc: &Document, keywords: &[String]) -> f64 {
    let haystack = format!(
        "{} {} {}",
        doc.name,
        doc.description_or_empty(),
        doc.content
    )
    .to_lowercase();
    let name = doc.name.to_lowercase();
    let haystack_words: Vec<String> = words(&haystack).into_iter().filter(|w| w.len() > 3).collect();

    let mut score = 0.0;
    for kw in keywords {
        if haystack.contains(kw.as_str()) {
            score += 1.0;
            if name.contains(kw.as_str()) {
                score += NAME_MATCH_BONUS;
            }
            let extra = count_occurrences(&haystack, kw).saturating_sub(1);
            score += extra.min(MAX_REPEAT_BONUS) as f64;
        }

        if kw.len() > 3
            && haystack_words
                .iter()
                .any(|w| w.contains(kw.as_str()) || kw.contains(w.as_str()))
        {
            score += PARTIAL_MATCH_BONUS;
        }
    }

    if name.contains("faq") || name.contains("help") {
        score += HELP_NAME_BONUS;
    }

    score
}

/// Scores every document and keeps the best [`TOP_DOCUMENTS`].
///
/// Sorted by descending score; equal scores keep corpus order.
pub fn score_documents(documents: &[Document], keywords: &[String]) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = documents
        .iter()
        .map(|d| ScoredDocument {
            document: d.clone(),
            score: score_document(d, keywords),
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(TOP_DOCUMENTS);
    scored
}

/// Document with the most query words (longer than 3 chars) found anywhere in it.
///
/// Used when the full pipeline cannot run. Ties keep corpus order; `None`
/// when nothing matches at all.
pub fn best_loose_match<'a>(documents: &'a [Document], search_text: &str) -> Option<&'a Document> {
    let terms: Vec<String> = words(search_text).into_iter().filter(|w| w.len() > 3).collect();
    let mut best: Option<(&Document, usize)> = None;
    for doc in documents {
        let haystack = format!(
            "{} {} {}",
            doc.name,
            doc.description_or_empty(),
            doc.content
        )
        .to_lowercase();
        let hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
        if hits > 0 && best.is_none_or(|(_, b)| hits > b) {
            best = Some((doc, hits));
        }
    }
    best.map(|(d, _)| d)
}
