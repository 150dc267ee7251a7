//! Runtime configuration loaded from environment variables.

use std::time::Duration;

use knowledge_store::ChunkingConfig;

use crate::backend::GenerationParams;
use crate::scorer::TOP_DOCUMENTS;

/// Knobs of the reply engine. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Upper bound for one generative call.
    pub generation_timeout: Duration,
    /// Upper bound for one vector search.
    pub vector_search_timeout: Duration,
    pub vector_top_k: usize,
    pub generation: GenerationParams,
    /// Dimension of the offline bag-of-words embedder.
    pub bow_dim: usize,
    pub chunking: ChunkingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(60),
            vector_search_timeout: Duration::from_secs(10),
            vector_top_k: TOP_DOCUMENTS,
            generation: GenerationParams::default(),
            bow_dim: 256,
            chunking: ChunkingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Build from environment variables; unset or unparsable values keep the default.
    ///
    /// # Example
    /// ```
    /// # use reply_engine::EngineConfig;
    /// let cfg = EngineConfig::from_env();
    /// assert!(cfg.vector_top_k >= 1);
    /// ```
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            generation_timeout: Duration::from_secs(parse(
                "GENERATION_TIMEOUT_SECS",
                d.generation_timeout.as_secs(),
            )),
            vector_search_timeout: Duration::from_secs(parse(
                "VECTOR_SEARCH_TIMEOUT_SECS",
                d.vector_search_timeout.as_secs(),
            )),
            vector_top_k: parse("VECTOR_TOP_K", d.vector_top_k).max(1),
            generation: GenerationParams {
                temperature: parse("LLM_TEMPERATURE", d.generation.temperature),
                max_tokens: parse("LLM_MAX_TOKENS", d.generation.max_tokens),
            },
            bow_dim: parse("BOW_DIM", d.bow_dim).max(1),
            chunking: ChunkingConfig::from_env(),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
