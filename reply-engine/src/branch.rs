//! Branch selection: FAQ match, one of the intent branches, or general.
//!
//! Every branch ends in a [`Selection`] that the composer can render; there
//! are no retries and no cycles.

use knowledge_store::Document;
use tracing::{debug, info};

use crate::api_types::ReplyBranch;
use crate::classifier::{
    IntentCategory, PASSWORD_RESET_PHRASES, RESET_SYNONYMS, analyze_query_style, classify_intent,
    is_password_reset, query_type_score,
};
use crate::composer::{compose_fallback, compose_reply};
use crate::dedup::pick_supplement;
use crate::faq::{FaqPair, accepts, best_faq_match, extract_faq_pairs, is_faq_content};
use crate::query::Query;
use crate::text::{contains_any, count_occurrences};

/// Body of a reply before composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Content {
        primary: String,
        supplement: Option<String>,
    },
    /// No document qualified; the branch's canned paragraph is used.
    Canned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub branch: ReplyBranch,
    pub body: Body,
}

impl Selection {
    fn canned(branch: ReplyBranch) -> Self {
        Self {
            branch,
            body: Body::Canned,
        }
    }

    pub fn render(&self, query: &Query) -> String {
        match &self.body {
            Body::Content {
                primary,
                supplement,
            } => compose_reply(
                self.branch,
                &query.customer_name,
                &query.display_title,
                primary,
                supplement.as_deref(),
            ),
            Body::Canned => compose_fallback(self.branch, &query.customer_name, &query.display_title),
        }
    }
}

/// Runs FAQ matching, then intent routing, over the candidate pool.
pub fn select_reply(candidates: &[Document], query: &Query) -> Selection {
    let query_lower = query.search_lower();
    let keywords = query.keywords();

    if let Some(best) = best_faq_match(candidates, &query_lower, &keywords) {
        if accepts(&best, keywords.len()) {
            info!(
                question = %best.pair.question,
                score = best.score,
                keywords = keywords.len(),
                "faq match accepted"
            );
            let supplement = pick_supplement(candidates, &best.pair.answer);
            return Selection {
                branch: ReplyBranch::FaqMatch,
                body: Body::Content {
                    primary: best.pair.answer,
                    supplement,
                },
            };
        }
        debug!(score = best.score, "best faq pair below threshold");
    }

    let scores = classify_intent(&query_lower);
    match scores.primary() {
        Some((category, score)) => {
            info!(?category, score, ?scores, "intent detected");
            select_topical(category, candidates, &query_lower, &keywords)
        }
        None => {
            info!("no intent detected, treating as general inquiry");
            select_general(candidates, &query_lower, &keywords)
        }
    }
}

/// Documents a branch may draw from.
fn matches_topic(branch: ReplyBranch, doc: &Document) -> bool {
    let content = doc.content.to_lowercase();
    let name = doc.name.to_lowercase();
    match branch {
        ReplyBranch::Subscription => {
            let topic = ["subscription", "plan", "pricing"];
            contains_any(&content, &topic) || contains_any(&name, &topic)
        }
        ReplyBranch::Technical => {
            contains_any(&content, &["troubleshoot", "fix", "error", "issue", "problem"])
                || contains_any(&name, &["troubleshoot", "guide", "help"])
        }
        ReplyBranch::PasswordReset => {
            content.contains("password") && contains_any(&content, RESET_SYNONYMS)
        }
        ReplyBranch::Account => {
            contains_any(&content, &["account", "login"]) || contains_any(&name, &["account", "user"])
        }
        ReplyBranch::Refund => {
            contains_any(&content, &["refund", "money back", "cancel"])
                || contains_any(&name, &["refund", "payment"])
        }
        ReplyBranch::Feature => {
            contains_any(&content, &["feature", "functionality", "capability"])
                || contains_any(&name, &["feature", "guide"])
        }
        _ => false,
    }
}

fn ranking_phrases(branch: ReplyBranch) -> &'static [&'static str] {
    match branch {
        ReplyBranch::Subscription => IntentCategory::Subscription.phrases(),
        ReplyBranch::Technical => IntentCategory::Technical.phrases(),
        ReplyBranch::Account => IntentCategory::Account.phrases(),
        ReplyBranch::PasswordReset => PASSWORD_RESET_PHRASES,
        ReplyBranch::Refund => IntentCategory::Refund.phrases(),
        ReplyBranch::Feature => IntentCategory::Feature.phrases(),
        _ => &[],
    }
}

/// Narrows the top document's content to one pair when the branch allows it.
fn extract_sub_pair(branch: ReplyBranch, content: &str, keywords: &[String]) -> Option<String> {
    if branch == ReplyBranch::Subscription || !is_faq_content(content) {
        return None;
    }
    let pairs = extract_faq_pairs(content);
    let render = |p: &FaqPair| format!("{}\n\n{}", p.question, p.answer);

    match branch {
        ReplyBranch::PasswordReset => pairs
            .into_iter()
            .find(|p| {
                let q = p.question.to_lowercase();
                q.contains("password") && contains_any(&q, RESET_SYNONYMS)
            })
            .map(|p| p.answer),
        ReplyBranch::Refund => pairs
            .iter()
            .find(|p| contains_any(&p.question.to_lowercase(), &["refund", "money back", "cancel"]))
            .map(render),
        _ => pairs
            .iter()
            .find(|p| query_type_score(&p.question.to_lowercase(), keywords) > 0)
            .map(render),
    }
}

fn select_topical(
    category: IntentCategory,
    candidates: &[Document],
    query_lower: &str,
    keywords: &[String],
) -> Selection {
    let branch = match category {
        IntentCategory::Subscription => ReplyBranch::Subscription,
        IntentCategory::Technical => ReplyBranch::Technical,
        IntentCategory::Account if is_password_reset(query_lower) => ReplyBranch::PasswordReset,
        IntentCategory::Account => ReplyBranch::Account,
        IntentCategory::Refund => ReplyBranch::Refund,
        IntentCategory::Feature => ReplyBranch::Feature,
    };

    let mut pool: Vec<&Document> = candidates
        .iter()
        .filter(|d| matches_topic(branch, d))
        .collect();
    if pool.is_empty() {
        info!(?branch, "no topical documents, using canned reply");
        return Selection::canned(branch);
    }

    let phrases = ranking_phrases(branch);
    pool.sort_by_key(|d| std::cmp::Reverse(query_type_score(&d.content, phrases)));

    let top = &pool[0].content;
    let extracted = extract_sub_pair(branch, top, keywords);
    let primary = extracted.unwrap_or_else(|| top.clone());

    // Technical replies are deduplicated against the whole source document.
    let dedup_against = if branch == ReplyBranch::Technical {
        top.as_str()
    } else {
        primary.as_str()
    };
    let supplement = pick_supplement(&pool, dedup_against);

    info!(
        ?branch,
        document = %pool[0].name,
        pool = pool.len(),
        supplement = supplement.is_some(),
        "topical document selected"
    );
    Selection {
        branch,
        body: Body::Content {
            primary,
            supplement,
        },
    }
}

const EARLY_WINDOW: usize = 100;
const EARLY_BONUS: f64 = 0.5;
const REPEAT_WEIGHT: f64 = 0.3;
const MAX_REPEATS: usize = 3;

/// Keyword relevance of raw content, favouring early mentions.
pub fn content_relevance(content: &str, keywords: &[String]) -> f64 {
    let lower = content.to_lowercase();
    let early = crate::text::take_chars(&lower, EARLY_WINDOW);
    let mut score = 0.0;
    for kw in keywords {
        if !lower.contains(kw.as_str()) {
            continue;
        }
        score += 1.0;
        if early.contains(kw.as_str()) {
            score += EARLY_BONUS;
        }
        let extra = count_occurrences(&lower, kw).saturating_sub(1);
        score += extra.min(MAX_REPEATS) as f64 * REPEAT_WEIGHT;
    }
    score
}

const QUESTION_HIT: f64 = 1.5;
const ANSWER_HIT: f64 = 0.5;
const MIN_PAIR_SCORE: f64 = 1.0;

/// Pair whose question and answer mention the most keywords, if any scores at least 1.
pub fn best_qa_pair(content: &str, keywords: &[String]) -> Option<FaqPair> {
    let mut best: Option<FaqPair> = None;
    let mut best_score = 0.0;
    for pair in extract_faq_pairs(content) {
        let q = pair.question.to_lowercase();
        let a = pair.answer.to_lowercase();
        let score: f64 = keywords
            .iter()
            .map(|k| {
                let mut s = 0.0;
                if q.contains(k.as_str()) {
                    s += QUESTION_HIT;
                }
                if a.contains(k.as_str()) {
                    s += ANSWER_HIT;
                }
                s
            })
            .sum();
        if score > best_score {
            best_score = score;
            best = Some(pair);
        }
    }
    best.filter(|_| best_score >= MIN_PAIR_SCORE)
}

fn select_general(candidates: &[Document], query_lower: &str, keywords: &[String]) -> Selection {
    let style = analyze_query_style(query_lower);
    info!(?style, "general inquiry");

    if candidates.is_empty() {
        return Selection::canned(ReplyBranch::General);
    }

    let mut sorted: Vec<&Document> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        content_relevance(&b.content, keywords).total_cmp(&content_relevance(&a.content, keywords))
    });

    let most = sorted[0];
    let primary = if is_faq_content(&most.content) {
        best_qa_pair(&most.content, keywords)
            .map(|p| format!("{}\n\n{}", p.question, p.answer))
            .unwrap_or_else(|| most.content.clone())
    } else {
        most.content.clone()
    };
    let supplement = pick_supplement(&sorted, &most.content);

    Selection {
        branch: ReplyBranch::General,
        body: Body::Content {
            primary,
            supplement,
        },
    }
}
