//! Prompt for the generative backend.

use crate::query::Query;

/// Ticket prompt sent as a single user message.
///
/// # Example
/// ```
/// # use reply_engine::{Query, ReplyRequest, prompt::build_ticket_prompt};
/// let q = Query::from_request(&ReplyRequest {
///     title: Some("Login".into()),
///     description: Some("Cannot sign in".into()),
///     ..Default::default()
/// }).unwrap();
/// let p = build_ticket_prompt(&q);
/// assert!(p.contains("Title: Login"));
/// ```
pub fn build_ticket_prompt(query: &Query) -> String {
    format!(
        "The customer {} has submitted a ticket with the following details:\n\n\
         Title: {}\n\n\
         Description: {}\n\n\
         Please provide a helpful and concise response to address their issue.",
        query.customer_name, query.display_title, query.description
    )
}
