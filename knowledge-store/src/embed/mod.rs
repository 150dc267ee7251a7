use crate::BoxFuture;
use crate::errors::StoreError;

/// Provider interface for embedding generation.
///
/// Async is required because real providers (Ollama) perform HTTP requests.
/// Implementations are chosen explicitly by the caller and shared as
/// `Arc<dyn EmbeddingsProvider>`.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds a single text.
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

pub mod ollama;
