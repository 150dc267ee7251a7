//! Default model configs loaded from environment variables.
//!
//! Two roles are used by the support workspace:
//!
//! - **Chat** → reply generation with the fine-tuned support model
//! - **Embedding** → vectors for the knowledge index
//!
//! # Environment variables
//!
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//! - `OLLAMA_MODEL`       = preferred chat model (default `ticket-support-assistant`)
//! - `OLLAMA_BASE_MODEL`  = fallback model name prefix (default `llama2`)
//! - `LLM_TEMPERATURE`    = sampling temperature (default `0.7`)
//! - `LLM_MAX_TOKENS`     = `num_predict` (default `2048`)
//! - `LLM_TIMEOUT_SECS`   = request timeout (default `60`)
//! - `EMBEDDING_MODEL`    = embedding model (default `llama2`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, env_opt_u64, env_or,
        validate_http_endpoint, validate_range_f32,
    },
};

/// Endpoint used when neither `OLLAMA_URL` nor `OLLAMA_PORT` is set.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Fine-tuned support model preferred for reply generation.
pub const DEFAULT_CHAT_MODEL: &str = "ticket-support-assistant";
/// Name prefix of the base model accepted when the fine-tuned one is missing.
pub const DEFAULT_BASE_MODEL_PREFIX: &str = "llama2";
/// Model used for embeddings when `EMBEDDING_MODEL` is unset.
pub const DEFAULT_EMBEDDING_MODEL: &str = "llama2";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. [`DEFAULT_OLLAMA_URL`]
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is not a valid port
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` lacks an http(s) scheme
pub fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", url.trim())?;
            return Ok(url.trim().to_string());
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

/// Constructs the config for the **chat** model used to draft replies.
///
/// # Defaults
/// - `model = "ticket-support-assistant"`
/// - `temperature = Some(0.7)`
/// - `max_tokens = Some(2048)`
/// - `timeout_secs = Some(60)`
pub fn config_ollama_chat() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = env_or("OLLAMA_MODEL", DEFAULT_CHAT_MODEL);
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Constructs the config for the **embedding** model.
///
/// # Defaults
/// - `model = "llama2"`
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Prefix accepted for the base model (`OLLAMA_BASE_MODEL`, default `llama2`).
pub fn base_model_prefix() -> String {
    env_or("OLLAMA_BASE_MODEL", DEFAULT_BASE_MODEL_PREFIX)
}
