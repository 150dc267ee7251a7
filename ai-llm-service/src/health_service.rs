//! Health probes for the Ollama server.
//!
//! - `GET {endpoint}/api/version` confirms the server responds
//! - `GET {endpoint}/api/tags` lists installed models
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).
//! The strict probes ([`HealthService::server_version`], [`HealthService::list_models`])
//! return `Result` and are used by the session to pick a model.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, HealthError, make_snippet};

/// A serializable health snapshot for a single config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Server version reported by `/api/version`, when reachable.
    pub version: Option<String>,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probes.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(
        cfg: &LlmModelConfig,
        version: Option<String>,
        ok: bool,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            version,
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks that the server responds and that `cfg.model` is installed.
    ///
    /// Never returns an error: any failure becomes `HealthStatus { ok: false, .. }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();

        let version = match self.server_version(cfg).await {
            Ok(v) => v,
            Err(err) => {
                warn!(
                    endpoint = %cfg.endpoint,
                    error = %err,
                    "health probe failed at /api/version"
                );
                return HealthStatus::new(
                    cfg,
                    None,
                    false,
                    start.elapsed().as_millis(),
                    err.to_string(),
                );
            }
        };

        let status = match self.list_models(cfg).await {
            Ok(models) if models.iter().any(|m| m == &cfg.model) => HealthStatus::new(
                cfg,
                Some(version),
                true,
                start.elapsed().as_millis(),
                "Ollama is healthy; model is available",
            ),
            Ok(_) => HealthStatus::new(
                cfg,
                Some(version),
                false,
                start.elapsed().as_millis(),
                "Ollama is up, but model not found in /api/tags",
            ),
            Err(err) => HealthStatus::new(
                cfg,
                Some(version),
                false,
                start.elapsed().as_millis(),
                err.to_string(),
            ),
        };

        info!(
            endpoint = %status.endpoint,
            model = %cfg.model,
            ok = status.ok,
            latency_ms = status.latency_ms,
            "health probe completed"
        );
        status
    }

    /// Strict `GET /api/version`.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and undecodable bodies.
    pub async fn server_version(&self, cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
        #[derive(Deserialize)]
        struct Version {
            version: String,
        }

        let body: Version = self.get_json(cfg, "/api/version").await?;
        Ok(body.version)
    }

    /// Strict `GET /api/tags`, returning installed model names in server order.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and undecodable bodies.
    pub async fn list_models(&self, cfg: &LlmModelConfig) -> Result<Vec<String>, AiLlmError> {
        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        let tags: Tags = self.get_json(cfg, "/api/tags").await?;
        let names: Vec<String> = tags
            .models
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.name)
            .collect();
        debug!(count = names.len(), models = ?names, "available models");
        Ok(names)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        cfg: &LlmModelConfig,
        path: &str,
    ) -> Result<T, AiLlmError> {
        let base = cfg.base_url();
        if base.is_empty() || !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(HealthError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let url = format!("{base}{path}");
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        debug!(endpoint = %cfg.endpoint, "GET {}", url);
        let resp = self.client.get(&url).timeout(timeout).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(%url, %status, %snippet, "health GET returned non-success status");
            return Err(HealthError::HttpStatus {
                status,
                url,
                snippet,
            }
            .into());
        }

        resp.json::<T>()
            .await
            .map_err(|e| HealthError::Decode(format!("{url}: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "ticket-support-assistant".into(),
            endpoint: endpoint.into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn invalid_endpoint_is_reported_not_raised() {
        let svc = HealthService::new(Some(1)).expect("client");
        let status = svc.check(&cfg("not-a-url")).await;
        assert!(!status.ok);
        assert!(status.version.is_none());
        assert!(status.message.contains("invalid endpoint"));
    }

    #[tokio::test]
    async fn strict_probe_rejects_invalid_endpoint() {
        let svc = HealthService::new(Some(1)).expect("client");
        let err = svc.list_models(&cfg("")).await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Health(HealthError::InvalidEndpoint(_))
        ));
    }
}
