//! Runtime configuration for chunking and the Qdrant index.

use crate::errors::StoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// How documents are split before embedding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// `CHUNK_SIZE` / `CHUNK_OVERLAP`, defaulting to 1000 / 200.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            chunk_size: parse("CHUNK_SIZE", d.chunk_size),
            chunk_overlap: parse("CHUNK_OVERLAP", d.chunk_overlap),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.chunk_size == 0 {
            return Err(StoreError::Config("chunk_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(StoreError::Config(
                "chunk_overlap must be smaller than chunk_size".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration of the Qdrant-backed vector index.
#[derive(Clone, Debug)]
pub struct QdrantConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub url: String,
    /// Optional API key for Qdrant Cloud.
    pub api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size.
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl QdrantConfig {
    /// Creates a default config for a given endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
        }
    }

    /// `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`, `QDRANT_BATCH_SIZE`,
    /// `QDRANT_EXACT_SEARCH`.
    pub fn from_env() -> Self {
        let mut cfg = Self::new_default(
            env("QDRANT_URL", "http://127.0.0.1:6334"),
            env("QDRANT_COLLECTION", "company_data"),
        );
        cfg.api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        cfg.upsert_batch = parse("QDRANT_BATCH_SIZE", cfg.upsert_batch);
        cfg.exact_search = env("QDRANT_EXACT_SEARCH", "false") == "true";
        cfg
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.url.trim().is_empty() {
            return Err(StoreError::Config("qdrant url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(StoreError::Config("upsert_batch must be > 0".into()));
        }
        Ok(())
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_defaults_and_validation() {
        let c = ChunkingConfig::default();
        assert_eq!((c.chunk_size, c.chunk_overlap), (1000, 200));
        assert!(c.validate().is_ok());
        let bad = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 100,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn qdrant_validation() {
        assert!(QdrantConfig::new_default("http://localhost:6334", "company_data")
            .validate()
            .is_ok());
        assert!(QdrantConfig::new_default("", "company_data").validate().is_err());
        let mut cfg = QdrantConfig::new_default("http://localhost:6334", "c");
        cfg.upsert_batch = 0;
        assert!(cfg.validate().is_err());
    }
}
