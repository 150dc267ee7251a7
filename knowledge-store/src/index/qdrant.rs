use std::sync::Arc;

use tracing::info;

use crate::BoxFuture;
use crate::config::QdrantConfig;
use crate::document::Document;
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::index::{VectorIndex, embed_all};
use crate::qdrant_facade::QdrantFacade;

/// Vector index persisted in a Qdrant collection.
///
/// The collection is created on first insert, sized after the first embedding.
pub struct QdrantVectorIndex {
    facade: QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
    upsert_batch: usize,
}

impl QdrantVectorIndex {
    pub fn new(cfg: &QdrantConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Result<Self, StoreError> {
        Ok(Self {
            facade: QdrantFacade::new(cfg)?,
            embedder,
            upsert_batch: cfg.upsert_batch,
        })
    }
}

impl VectorIndex for QdrantVectorIndex {
    fn add_documents<'a>(&'a self, docs: Vec<Document>) -> BoxFuture<'a, Result<usize, StoreError>> {
        Box::pin(async move {
            let embedded = embed_all(self.embedder.as_ref(), docs, 4).await?;
            let Some(size) = embedded.first().map(|(_, v)| v.len()) else {
                return Ok(0);
            };
            if let Some((_, v)) = embedded.iter().find(|(_, v)| v.len() != size) {
                return Err(StoreError::VectorSizeMismatch {
                    got: v.len(),
                    want: size,
                });
            }

            self.facade.ensure_collection(size).await?;

            let mut total = 0;
            let mut rest = embedded;
            while !rest.is_empty() {
                let tail = rest.split_off(rest.len().min(self.upsert_batch));
                total += self.facade.upsert(rest).await?;
                rest = tail;
            }
            info!(points = total, embedder = self.embedder.name(), "qdrant index updated");
            Ok(total)
        })
    }

    fn similarity_search<'a>(
        &'a self,
        query: &'a str,
        k: usize,
    ) -> BoxFuture<'a, Result<Vec<Document>, StoreError>> {
        Box::pin(async move {
            let qv = self.embedder.embed(query).await?;
            let hits = self.facade.search(qv, k as u64).await?;
            Ok(hits.into_iter().map(|(_, doc)| doc).collect())
        })
    }
}
