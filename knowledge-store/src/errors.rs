//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for knowledge-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O or filesystem errors.
    #[error("[Knowledge Store] io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("[Knowledge Store] parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Corpus file has an unsupported shape or extension.
    #[error("[Knowledge Store] unsupported corpus format: {0}")]
    Format(String),

    /// Invalid or unsupported configuration.
    #[error("[Knowledge Store] config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality.
    #[error("[Knowledge Store] vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// The embedding backend failed.
    #[error("[Knowledge Store] embedding error: {0}")]
    Embedding(String),

    /// Qdrant client errors (wrapped).
    #[error("[Knowledge Store] qdrant error: {0}")]
    Qdrant(String),
}
