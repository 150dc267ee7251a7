//! Intent classification by phrase presence.

use regex::RegexBuilder;
use serde::Serialize;

use crate::text::{contains_any, count_occurrences};

pub const SUBSCRIPTION_PHRASES: &[&str] = &[
    "subscription",
    "plan",
    "pricing",
    "payment",
    "free trial",
    "upgrade",
    "downgrade",
    "cancel",
];
pub const TECHNICAL_PHRASES: &[&str] = &[
    "error",
    "bug",
    "issue",
    "problem",
    "not working",
    "broken",
    "fix",
    "help",
];
pub const ACCOUNT_PHRASES: &[&str] = &[
    "account", "login", "password", "email", "sign in", "sign up", "register",
];
pub const REFUND_PHRASES: &[&str] = &["refund", "money back", "cancel", "return"];
pub const FEATURE_PHRASES: &[&str] = &["feature", "how to", "can i", "functionality", "option"];

pub const PASSWORD_RESET_PHRASES: &[&str] = &[
    "password reset",
    "reset password",
    "forgot password",
    "change password",
];
pub const RESET_SYNONYMS: &[&str] = &["reset", "forgot", "change"];

const PHRASE_WEIGHT: u32 = 2;
const MAX_REPEAT_BONUS: usize = 2;

/// Support topics a query can be routed to.
///
/// Declaration order is the tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Subscription,
    Technical,
    Account,
    Refund,
    Feature,
}

impl IntentCategory {
    pub const ALL: [IntentCategory; 5] = [
        IntentCategory::Subscription,
        IntentCategory::Technical,
        IntentCategory::Account,
        IntentCategory::Refund,
        IntentCategory::Feature,
    ];

    /// Phrases that signal this category in a query.
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            IntentCategory::Subscription => SUBSCRIPTION_PHRASES,
            IntentCategory::Technical => TECHNICAL_PHRASES,
            IntentCategory::Account => ACCOUNT_PHRASES,
            IntentCategory::Refund => REFUND_PHRASES,
            IntentCategory::Feature => FEATURE_PHRASES,
        }
    }
}

/// Per-category scores for one query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntentScores {
    pub subscription: u32,
    pub technical: u32,
    pub account: u32,
    pub refund: u32,
    pub feature: u32,
}

impl IntentScores {
    pub fn get(&self, category: IntentCategory) -> u32 {
        match category {
            IntentCategory::Subscription => self.subscription,
            IntentCategory::Technical => self.technical,
            IntentCategory::Account => self.account,
            IntentCategory::Refund => self.refund,
            IntentCategory::Feature => self.feature,
        }
    }

    fn slot(&mut self, category: IntentCategory) -> &mut u32 {
        match category {
            IntentCategory::Subscription => &mut self.subscription,
            IntentCategory::Technical => &mut self.technical,
            IntentCategory::Account => &mut self.account,
            IntentCategory::Refund => &mut self.refund,
            IntentCategory::Feature => &mut self.feature,
        }
    }

    /// Highest non-zero category; ties go to the earlier category.
    pub fn primary(&self) -> Option<(IntentCategory, u32)> {
        let mut best: Option<(IntentCategory, u32)> = None;
        for category in IntentCategory::ALL {
            let score = self.get(category);
            if score > 0 && best.is_none_or(|(_, b)| score > b) {
                best = Some((category, score));
            }
        }
        best
    }
}

/// Scores every category: +2 for each of its phrases found in the query.
pub fn classify_intent(query_lower: &str) -> IntentScores {
    let mut scores = IntentScores::default();
    for category in IntentCategory::ALL {
        let hits = category
            .phrases()
            .iter()
            .filter(|p| query_lower.contains(*p))
            .count() as u32;
        *scores.slot(category) = hits * PHRASE_WEIGHT;
    }
    scores
}

/// "password" together with one of reset / forgot / change.
pub fn is_password_reset(query_lower: &str) -> bool {
    query_lower.contains("password") && contains_any(query_lower, RESET_SYNONYMS)
}

/// Topical score of `text` against a phrase list.
///
/// Each present phrase adds 1 plus up to 2 for repeats. Whitespace inside a
/// phrase matches any whitespace run.
pub fn query_type_score<S: AsRef<str>>(text: &str, phrases: &[S]) -> u32 {
    let lower = text.to_lowercase();
    let mut score = 0;
    for phrase in phrases {
        let phrase = phrase.as_ref().to_lowercase();
        if phrase.is_empty() || !lower.contains(phrase.as_str()) {
            continue;
        }
        let count = phrase_occurrences(&lower, &phrase);
        score += 1 + count.saturating_sub(1).min(MAX_REPEAT_BONUS) as u32;
    }
    score
}

fn phrase_occurrences(text: &str, phrase: &str) -> usize {
    let pattern = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.find_iter(text).count(),
        Err(_) => count_occurrences(text, phrase),
    }
}

/// Coarse shape of the query, reported on the general path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStyle {
    Question,
    Complaint,
    Request,
    Statement,
}

const QUESTION_MARKERS: &[&str] = &[
    "?", "how", "what", "why", "when", "where", "can you", "could you",
];
const COMPLAINT_MARKERS: &[&str] = &[
    "not working",
    "problem",
    "issue",
    "doesn't work",
    "broken",
    "disappointed",
    "unhappy",
    "frustrated",
];
const REQUEST_MARKERS: &[&str] = &["please", "need", "want", "looking for", "help me"];

/// First matching style in the order question, complaint, request.
pub fn analyze_query_style(query_lower: &str) -> QueryStyle {
    if contains_any(query_lower, QUESTION_MARKERS) {
        QueryStyle::Question
    } else if contains_any(query_lower, COMPLAINT_MARKERS) {
        QueryStyle::Complaint
    } else if contains_any(query_lower, REQUEST_MARKERS) {
        QueryStyle::Request
    } else {
        QueryStyle::Statement
    }
}
