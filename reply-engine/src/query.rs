//! Validated query built from a [`ReplyRequest`].

use crate::api_types::ReplyRequest;
use crate::error::ReplyError;
use crate::text::extract_keywords;

pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";
pub const DEFAULT_DISPLAY_TITLE: &str = "your inquiry";
pub const DEFAULT_STATUS: &str = "Open";
pub const DEFAULT_PRIORITY: &str = "Medium";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Trimmed title; empty when the request had none.
    pub title: String,
    pub description: String,
    pub customer_name: String,
    /// Title shown in reply openings.
    pub display_title: String,
    /// Advisory only, never scored.
    pub status: String,
    /// Advisory only, never scored.
    pub priority: String,
    pub ticket_id: Option<String>,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Query {
    /// Validates `req` and applies defaults.
    ///
    /// `query` stands in for a blank description.
    ///
    /// # Errors
    /// [`ReplyError::InvalidQuery`] when title and description are both blank.
    pub fn from_request(req: &ReplyRequest) -> Result<Self, ReplyError> {
        let title = non_blank(&req.title).unwrap_or_default().to_string();
        let description = non_blank(&req.description)
            .or_else(|| non_blank(&req.query))
            .unwrap_or_default()
            .to_string();

        if title.is_empty() && description.is_empty() {
            return Err(ReplyError::InvalidQuery);
        }

        Ok(Self {
            display_title: if title.is_empty() {
                DEFAULT_DISPLAY_TITLE.to_string()
            } else {
                title.clone()
            },
            title,
            description,
            customer_name: non_blank(&req.customer_name)
                .unwrap_or(DEFAULT_CUSTOMER_NAME)
                .to_string(),
            status: non_blank(&req.status).unwrap_or(DEFAULT_STATUS).to_string(),
            priority: non_blank(&req.priority)
                .unwrap_or(DEFAULT_PRIORITY)
                .to_string(),
            ticket_id: non_blank(&req.ticket_id).map(str::to_string),
        })
    }

    /// `title + " " + description`.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    pub fn search_lower(&self) -> String {
        self.search_text().to_lowercase()
    }

    pub fn keywords(&self) -> Vec<String> {
        extract_keywords(&self.search_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: Option<&str>, description: Option<&str>) -> ReplyRequest {
        ReplyRequest {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn blank_title_and_description_are_rejected() {
        assert!(matches!(
            Query::from_request(&req(None, None)),
            Err(ReplyError::InvalidQuery)
        ));
        assert!(matches!(
            Query::from_request(&req(Some("   "), Some("\n\t"))),
            Err(ReplyError::InvalidQuery)
        ));
    }

    #[test]
    fn defaults_are_applied() {
        let q = Query::from_request(&req(None, Some("app keeps crashing"))).expect("query");
        assert_eq!(q.customer_name, "Customer");
        assert_eq!(q.display_title, "your inquiry");
        assert_eq!(q.status, "Open");
        assert_eq!(q.priority, "Medium");
        assert_eq!(q.search_text(), " app keeps crashing");
        assert_eq!(q.keywords(), vec!["app", "keeps", "crashing"]);
    }

    #[test]
    fn query_field_replaces_missing_description() {
        let r = ReplyRequest {
            title: Some("Billing".into()),
            query: Some("Where is my invoice?".into()),
            ..Default::default()
        };
        let q = Query::from_request(&r).expect("query");
        assert_eq!(q.description, "Where is my invoice?");
        assert_eq!(q.search_lower(), "billing where is my invoice?");
    }
}
