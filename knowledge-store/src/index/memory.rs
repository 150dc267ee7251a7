use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::BoxFuture;
use crate::document::Document;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::index::{VectorIndex, cosine_similarity, embed_all};

/// Brute-force cosine index held in memory.
pub struct InMemoryVectorIndex {
    embedder: Arc<dyn EmbeddingsProvider>,
    entries: RwLock<Vec<(Document, Vec<f32>)>>,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl VectorIndex for InMemoryVectorIndex {
    fn add_documents<'a>(&'a self, docs: Vec<Document>) -> BoxFuture<'a, Result<usize, StoreError>> {
        Box::pin(async move {
            let embedded = embed_all(self.embedder.as_ref(), docs, 4).await?;
            let n = embedded.len();
            self.entries.write().await.extend(embedded);
            debug!(added = n, embedder = self.embedder.name(), "in-memory index updated");
            Ok(n)
        })
    }

    fn similarity_search<'a>(
        &'a self,
        query: &'a str,
        k: usize,
    ) -> BoxFuture<'a, Result<Vec<Document>, StoreError>> {
        Box::pin(async move {
            let qv = self.embedder.embed(query).await?;
            let entries = self.entries.read().await;

            let mut scored: Vec<(f32, &Document)> = entries
                .iter()
                .map(|(doc, v)| (cosine_similarity(&qv, v), doc))
                .collect();
            // Stable: equal scores keep insertion order.
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));

            Ok(scored
                .into_iter()
                .take(k)
                .map(|(_, doc)| doc.clone())
                .collect())
        })
    }
}
