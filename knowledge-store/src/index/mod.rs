//! Vector indexes: alternate ranking source for the candidate pool.

use futures::{StreamExt, TryStreamExt, stream};
use tracing::info;

use crate::BoxFuture;
use crate::chunk::chunk_documents;
use crate::config::ChunkingConfig;
use crate::document::Document;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;

mod memory;
mod qdrant;

pub use memory::InMemoryVectorIndex;
pub use qdrant::QdrantVectorIndex;

/// Similarity search over embedded documents.
pub trait VectorIndex: Send + Sync {
    /// Embeds and stores already-chunked documents. Returns how many were stored.
    fn add_documents<'a>(&'a self, docs: Vec<Document>) -> BoxFuture<'a, Result<usize, StoreError>>;

    /// Up to `k` documents most similar to `query`, best first.
    fn similarity_search<'a>(
        &'a self,
        query: &'a str,
        k: usize,
    ) -> BoxFuture<'a, Result<Vec<Document>, StoreError>>;
}

/// Chunks the corpus and feeds it to `index`.
pub async fn index_corpus(
    index: &dyn VectorIndex,
    docs: &[Document],
    chunking: &ChunkingConfig,
) -> Result<usize, StoreError> {
    chunking.validate()?;
    let chunks = chunk_documents(docs, chunking);
    info!(
        documents = docs.len(),
        chunks = chunks.len(),
        chunk_size = chunking.chunk_size,
        chunk_overlap = chunking.chunk_overlap,
        "indexing corpus"
    );
    index.add_documents(chunks).await
}

/// Embeds every document, keeping input order, at most `concurrency` requests in flight.
pub(crate) async fn embed_all(
    provider: &dyn EmbeddingsProvider,
    docs: Vec<Document>,
    concurrency: usize,
) -> Result<Vec<(Document, Vec<f32>)>, StoreError> {
    stream::iter(docs)
        .map(|doc| async move {
            let v = provider.embed(&doc.content).await?;
            Ok::<_, StoreError>((doc, v))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Cosine similarity; `0.0` for empty, mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
