//! Conversation log for generated replies.

use chrono::{DateTime, Utc};
use knowledge_store::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api_types::ReplyBranch;
use crate::error::BackendError;

/// Author recorded for every generated reply.
pub const ASSISTANT_AUTHOR: &str = "AI Assistant";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub ticket_id: String,
    pub author: String,
    pub content: String,
    pub branch: ReplyBranch,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn assistant(ticket_id: impl Into<String>, content: impl Into<String>, branch: ReplyBranch) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            author: ASSISTANT_AUTHOR.to_string(),
            content: content.into(),
            branch,
            created_at: Utc::now(),
        }
    }
}

/// Sink for replies attached to a ticket. Failures never reach the caller.
pub trait ConversationRecorder: Send + Sync {
    fn record<'a>(&'a self, entry: ConversationEntry) -> BoxFuture<'a, Result<(), BackendError>>;
}

/// Process-local log.
#[derive(Debug, Default)]
pub struct InMemoryConversationLog {
    entries: Mutex<Vec<ConversationEntry>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ConversationEntry> {
        self.entries.lock().await.clone()
    }
}

impl ConversationRecorder for InMemoryConversationLog {
    fn record<'a>(&'a self, entry: ConversationEntry) -> BoxFuture<'a, Result<(), BackendError>> {
        Box::pin(async move {
            self.entries.lock().await.push(entry);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_keep_insertion_order() {
        let log = InMemoryConversationLog::new();
        log.record(ConversationEntry::assistant("T-1", "first", ReplyBranch::General))
            .await
            .expect("record");
        log.record(ConversationEntry::assistant("T-1", "second", ReplyBranch::FaqMatch))
            .await
            .expect("record");
        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "first");
        assert_eq!(entries[1].branch, ReplyBranch::FaqMatch);
        assert!(entries.iter().all(|e| e.author == "AI Assistant"));
    }
}
