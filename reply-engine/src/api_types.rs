//! Public request/response types shared with the binary and any HTTP layer.

use serde::{Deserialize, Serialize};

/// Inbound reply request as forwarded by a ticket handler.
///
/// Every field is optional on the wire; [`crate::Query::from_request`]
/// validates and fills defaults.
///
/// # Example
/// ```
/// use reply_engine::ReplyRequest;
/// let req: ReplyRequest = serde_json::from_str(
///     r#"{"title":"Refund request","customerName":"Ana"}"#,
/// ).unwrap();
/// assert_eq!(req.customer_name.as_deref(), Some("Ana"));
/// assert!(req.description.is_none());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplyRequest {
    pub ticket_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Free-text question; used when `description` is blank.
    pub query: Option<String>,
    pub customer_name: Option<String>,
    #[serde(alias = "ticketStatus")]
    pub status: Option<String>,
    #[serde(alias = "ticketPriority")]
    pub priority: Option<String>,
}

/// Which path produced the reply text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyBranch {
    FaqMatch,
    Subscription,
    Technical,
    Account,
    PasswordReset,
    Refund,
    Feature,
    General,
    /// Text produced by the generative backend.
    Generated,
    /// Store was unreachable; the request was acknowledged.
    Acknowledgement,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ReplySource {
    Model { model: String },
    Pipeline,
}

/// Final reply handed back to the caller.
///
/// # Example
/// ```
/// use reply_engine::{GeneratedReply, ReplyBranch, ReplySource};
/// let r = GeneratedReply {
///     reply_text: "Dear Customer,\n\n...".into(),
///     branch: ReplyBranch::General,
///     source: ReplySource::Pipeline,
/// };
/// assert!(r.reply_text.starts_with("Dear"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReply {
    pub reply_text: String,
    pub branch: ReplyBranch,
    pub source: ReplySource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_prefixed_fields_are_accepted() {
        let req: ReplyRequest = serde_json::from_str(
            r#"{"description":"app down","ticketStatus":"Pending","ticketPriority":"High"}"#,
        )
        .expect("request");
        assert_eq!(req.status.as_deref(), Some("Pending"));
        assert_eq!(req.priority.as_deref(), Some("High"));
    }

    #[test]
    fn reply_serializes_camel_case_with_tagged_source() {
        let r = GeneratedReply {
            reply_text: "hi".into(),
            branch: ReplyBranch::PasswordReset,
            source: ReplySource::Model { model: "m".into() },
        };
        let v = serde_json::to_value(&r).expect("json");
        assert_eq!(v["replyText"], "hi");
        assert_eq!(v["branch"], "password_reset");
        assert_eq!(v["source"]["kind"], "model");
        assert_eq!(v["source"]["model"], "m");
    }
}
