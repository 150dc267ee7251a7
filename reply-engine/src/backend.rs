//! Generative backend seam and its Ollama adapter.

use std::sync::Arc;

use ai_llm_service::LlmSession;
use knowledge_store::BoxFuture;
use tracing::debug;

use crate::error::BackendError;

/// Sampling knobs forwarded to the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Text returned by a backend together with the model that wrote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
    pub model: String,
}

/// Optional text generator that can preempt the relevance pipeline.
///
/// Best effort: callers bound every call with a timeout and fall back on any
/// error.
pub trait GenerativeBackend: Send + Sync {
    fn try_generate<'a>(
        &'a self,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> BoxFuture<'a, Result<GeneratedText, BackendError>>;
}

/// Backend over a caller-owned [`LlmSession`].
///
/// The session lifecycle (`connect`/`close`) stays with the caller; a closed
/// session makes this backend unavailable.
pub struct OllamaBackend {
    session: Arc<LlmSession>,
}

impl OllamaBackend {
    pub fn new(session: Arc<LlmSession>) -> Self {
        Self { session }
    }
}

impl GenerativeBackend for OllamaBackend {
    fn try_generate<'a>(
        &'a self,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> BoxFuture<'a, Result<GeneratedText, BackendError>> {
        Box::pin(async move {
            let active = self
                .session
                .active()
                .await
                .ok_or_else(|| BackendError::Unavailable("LLM session is not connected".into()))?;

            let text = self
                .session
                .chat(prompt, Some(params.temperature), Some(params.max_tokens))
                .await?;
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(BackendError::EmptyResponse);
            }
            debug!(model = %active.model, chars = text.len(), "backend reply received");
            Ok(GeneratedText {
                text,
                model: active.model,
            })
        })
    }
}
