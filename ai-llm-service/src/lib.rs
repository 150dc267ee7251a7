//! Shared Ollama access for the support reply workspace.
//!
//! - [`config`]: model configs resolved from environment variables
//! - [`health_service`]: version/tags probes and model listing
//! - [`services::ollama_service`]: thin HTTP client for chat and embeddings
//! - [`session`]: the explicit connect/close lifecycle used by reply generation
//! - [`telemetry`]: tracing layer scoped to the workspace crates

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, HealthError, Result};
pub use health_service::{HealthService, HealthStatus};
pub use services::ollama_service::{OllamaError, OllamaService};
pub use session::{ActiveModel, LlmSession, ModelChoice, resolve_model};
