//! Ollama embedding provider implementation.

use std::sync::Arc;

use ai_llm_service::OllamaService;
use tracing::warn;

use crate::BoxFuture;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;

/// Ollama embedding provider (async, `/api/embeddings`).
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
    /// Expected dimension; `None` accepts whatever the model returns.
    dim: Option<usize>,
}

impl OllamaEmbedder {
    pub fn new(svc: Arc<OllamaService>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
        Box::pin(async move {
            let v = self
                .svc
                .embeddings(text)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;

            if let Some(want) = self.dim {
                if v.len() != want {
                    warn!(got = v.len(), want, model = %self.svc.model(), "embedding size mismatch");
                    return Err(StoreError::VectorSizeMismatch { got: v.len(), want });
                }
            }
            if v.is_empty() {
                return Err(StoreError::Embedding(format!(
                    "model `{}` returned an empty vector",
                    self.svc.model()
                )));
            }
            Ok(v)
        })
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
