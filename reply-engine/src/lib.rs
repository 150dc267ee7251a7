//! Support reply generation.
//!
//! Given a ticket (title, description, customer context), the engine first
//! offers the ticket to a generative backend. When that is unavailable, fails
//! or times out, a deterministic relevance pipeline runs over the company
//! knowledge corpus:
//!
//! 1. keyword scoring of every document, keeping the top five
//!    (or vector-search results when an index is configured)
//! 2. `Q:`/`A:` pair matching against the query with an adaptive threshold
//! 3. intent routing to a topical branch when no pair qualifies
//! 4. one supplementary snippet that does not repeat the primary answer
//! 5. composition from fixed per-branch templates
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use knowledge_store::{Document, InMemoryStore};
//! use reply_engine::{EngineConfig, ReplyEngine, ReplyRequest};
//!
//! # async fn run() -> Result<(), reply_engine::ReplyError> {
//! let store = InMemoryStore::new(vec![Document::new(
//!     "1",
//!     "Billing FAQ",
//!     "Q: How do I get a refund?\nA: Refunds are processed within 5 business days.",
//! )]);
//! let engine = ReplyEngine::new(Arc::new(store), EngineConfig::default());
//! let reply = engine
//!     .generate_reply(&ReplyRequest {
//!         title: Some("Refund request".into()),
//!         description: Some("I want a refund for last month".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}", reply.reply_text);
//! # Ok(())
//! # }
//! ```

mod api_types;
mod backend;
mod branch;
mod cfg;
mod embedder;
mod error;
mod pipeline;
mod query;
mod recorder;

pub mod classifier;
pub mod composer;
pub mod dedup;
pub mod faq;
pub mod prompt;
pub mod scorer;
pub mod text;

pub use api_types::{GeneratedReply, ReplyBranch, ReplyRequest, ReplySource};
pub use backend::{GeneratedText, GenerationParams, GenerativeBackend, OllamaBackend};
pub use branch::{Body, Selection, select_reply};
pub use cfg::EngineConfig;
pub use embedder::BagOfWordsEmbedder;
pub use error::{BackendError, ReplyError};
pub use pipeline::ReplyEngine;
pub use query::Query;
pub use recorder::{ConversationEntry, ConversationRecorder, InMemoryConversationLog};
