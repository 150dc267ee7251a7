use crate::config::llm_provider::LlmProvider;

/// Configuration for a single model invocation target.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "ticket-support-assistant".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     max_tokens: Some(2048),
///     temperature: Some(0.7),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.with_model("llama2:latest").model, "llama2:latest");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The backend serving the model.
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"ticket-support-assistant"`, `"llama2"`).
    pub model: String,

    /// Base URL of the inference server.
    pub endpoint: String,

    /// Maximum number of tokens to generate (`num_predict` for Ollama).
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Returns a copy of this config targeting another model on the same endpoint.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }

    /// Endpoint without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}
