//! Explicit chat session over a local Ollama server.
//!
//! The session is created by the application, connected once, shared as
//! `Arc<LlmSession>` with whoever needs generation, and closed on shutdown.
//! `connect` probes the server and resolves which model to use:
//!
//! 1. the preferred fine-tuned model (exact name match), otherwise
//! 2. the first model named `{base}` / `{base}:latest` or starting with `{base}`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmSession, config::default_config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Arc::new(LlmSession::new(
//!     default_config::config_ollama_chat()?,
//!     default_config::base_model_prefix(),
//! )?);
//! let active = session.connect().await?;
//! println!("using {}", active.model);
//! let text = session.chat("Hello", None, None).await?;
//! session.close().await;
//! # let _ = text;
//! # Ok(()) }
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::AiLlmError,
    health_service::HealthService,
    services::ollama_service::OllamaService,
};

/// Model picked by [`resolve_model`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    /// Installed model name as reported by `/api/tags`.
    pub name: String,
    /// `true` when the preferred fine-tuned model was found.
    pub fine_tuned: bool,
}

/// Snapshot of a connected session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveModel {
    pub model: String,
    pub fine_tuned: bool,
    pub server_version: String,
}

struct Connection {
    info: ActiveModel,
    client: OllamaService,
}

/// Chat session with explicit `connect`/`close` lifecycle.
pub struct LlmSession {
    cfg: LlmModelConfig,
    base_prefix: String,
    health: HealthService,
    conn: RwLock<Option<Arc<Connection>>>,
}

impl LlmSession {
    /// Creates a disconnected session.
    ///
    /// `cfg.model` is the preferred model; `base_prefix` names the accepted fallback.
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the probe client cannot be built.
    pub fn new(cfg: LlmModelConfig, base_prefix: impl Into<String>) -> Result<Self, AiLlmError> {
        let health = HealthService::new(Some(10))?;
        Ok(Self {
            cfg,
            base_prefix: base_prefix.into(),
            health,
            conn: RwLock::new(None),
        })
    }

    /// Probes the server, resolves a model and opens the chat client.
    ///
    /// Calling `connect` on a connected session re-resolves the model.
    ///
    /// # Errors
    /// - probe failures from `/api/version` or `/api/tags`
    /// - [`AiLlmError::NoModelAvailable`] when neither model is installed
    #[instrument(skip_all, fields(endpoint = %self.cfg.endpoint))]
    pub async fn connect(&self) -> Result<ActiveModel, AiLlmError> {
        let server_version = self.health.server_version(&self.cfg).await?;
        let models = self.health.list_models(&self.cfg).await?;

        let choice = resolve_model(&models, &self.cfg.model, &self.base_prefix).ok_or_else(
            || AiLlmError::NoModelAvailable {
                preferred: self.cfg.model.clone(),
                base_prefix: self.base_prefix.clone(),
            },
        )?;

        if !choice.fine_tuned {
            warn!(
                preferred = %self.cfg.model,
                using = %choice.name,
                "fine-tuned model not found; using base model instead"
            );
        }

        let client = OllamaService::new(self.cfg.with_model(choice.name.clone()))?;
        let info = ActiveModel {
            model: choice.name,
            fine_tuned: choice.fine_tuned,
            server_version,
        };

        info!(
            model = %info.model,
            fine_tuned = info.fine_tuned,
            version = %info.server_version,
            "LLM session connected"
        );

        *self.conn.write().await = Some(Arc::new(Connection {
            info: info.clone(),
            client,
        }));
        Ok(info)
    }

    /// Drops the active connection. Safe to call when already closed.
    pub async fn close(&self) {
        if let Some(conn) = self.conn.write().await.take() {
            info!(model = %conn.info.model, "LLM session closed");
        }
    }

    /// Current connection snapshot, if any.
    pub async fn active(&self) -> Option<ActiveModel> {
        self.conn.read().await.as_ref().map(|c| c.info.clone())
    }

    /// Sends a prompt to the connected model.
    ///
    /// # Errors
    /// - [`AiLlmError::NotConnected`] before `connect` or after `close`
    /// - [`AiLlmError::Ollama`] when the chat call fails or returns nothing
    pub async fn chat(
        &self,
        prompt: &str,
        temperature: Option<f32>,
        num_predict: Option<u32>,
    ) -> Result<String, AiLlmError> {
        // Clone the Arc so the lock is not held across the HTTP call.
        let conn = self
            .conn
            .read()
            .await
            .clone()
            .ok_or(AiLlmError::NotConnected)?;
        Ok(conn.client.chat(prompt, temperature, num_predict).await?)
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }
}

/// Picks the model to use from the installed list.
///
/// Returns `None` when neither the preferred model nor a base model is present.
pub fn resolve_model(available: &[String], preferred: &str, base_prefix: &str) -> Option<ModelChoice> {
    if available.iter().any(|m| m == preferred) {
        return Some(ModelChoice {
            name: preferred.to_string(),
            fine_tuned: true,
        });
    }

    let latest = format!("{base_prefix}:latest");
    available
        .iter()
        .find(|m| *m == base_prefix || **m == latest || m.starts_with(base_prefix))
        .map(|m| ModelChoice {
            name: m.clone(),
            fine_tuned: false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prefers_fine_tuned_model() {
        let got = resolve_model(
            &names(&["llama2:latest", "ticket-support-assistant"]),
            "ticket-support-assistant",
            "llama2",
        );
        assert_eq!(
            got,
            Some(ModelChoice {
                name: "ticket-support-assistant".into(),
                fine_tuned: true
            })
        );
    }

    #[test]
    fn falls_back_to_first_base_model() {
        let got = resolve_model(
            &names(&["mistral", "llama2:13b", "llama2:latest"]),
            "ticket-support-assistant",
            "llama2",
        )
        .expect("base model");
        assert_eq!(got.name, "llama2:13b");
        assert!(!got.fine_tuned);
    }

    #[test]
    fn no_usable_model() {
        assert!(resolve_model(&names(&["mistral"]), "ticket-support-assistant", "llama2").is_none());
        assert!(resolve_model(&[], "ticket-support-assistant", "llama2").is_none());
    }

    #[tokio::test]
    async fn chat_requires_connection() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "ticket-support-assistant".into(),
            endpoint: "http://127.0.0.1:9".into(),
            max_tokens: Some(16),
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(1),
        };
        let session = LlmSession::new(cfg, "llama2").expect("session");
        assert!(session.active().await.is_none());
        let err = session.chat("hello", None, None).await.unwrap_err();
        assert!(matches!(err, AiLlmError::NotConnected));
        session.close().await;
    }
}
