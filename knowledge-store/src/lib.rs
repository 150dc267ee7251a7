//! Company knowledge for the support reply engine.
//!
//! This crate provides:
//! - The [`Document`] model and the [`DocumentStore`] seam (in-memory or JSON/JSONL file)
//! - Chunking of documents for vector indexing
//! - The [`EmbeddingsProvider`] seam with an Ollama-backed implementation
//! - The [`VectorIndex`] seam with an in-memory cosine index and a Qdrant index
//!
//! Everything here is read-only with respect to the corpus; documents are
//! created and edited by the knowledge-base management side.

mod chunk;
mod config;
mod document;
pub mod embed;
mod errors;
mod index;
mod qdrant_facade;
mod store;

pub use chunk::{chunk_documents, split_text};
pub use config::{ChunkingConfig, DistanceKind, QdrantConfig};
pub use document::{Document, DocumentType};
pub use embed::EmbeddingsProvider;
pub use errors::StoreError;
pub use index::{
    InMemoryVectorIndex, QdrantVectorIndex, VectorIndex, cosine_similarity, index_corpus,
};
pub use store::{DocumentStore, InMemoryStore, JsonFileStore};

/// Boxed future returned by the async seams of this crate.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
