//! Typed errors for the reply-engine crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// The only failure a caller of [`crate::ReplyEngine::generate_reply`] sees.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// Title and description are both missing or blank.
    #[error("[Reply Engine] invalid query: title or description is required")]
    InvalidQuery,
}

/// Failure of an optional collaborator.
///
/// Never surfaced to callers; the engine logs it and falls back.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend is not configured or not connected.
    #[error("[Reply Engine] backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with blank text.
    #[error("[Reply Engine] backend returned an empty reply")]
    EmptyResponse,

    /// Errors from the ai-llm-service crate.
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    /// Conversation log write failed.
    #[error("[Reply Engine] recording failed: {0}")]
    Recording(String),
}
