//! `support-reply`: drafts a reply to one support ticket from a knowledge corpus.
//!
//! ```bash
//! support-reply --corpus ./data/company.jsonl \
//!     --title "Refund request" --description "I want a refund for last month"
//!
//! # Offer the ticket to the local model first, rank with an in-memory vector index
//! support-reply --corpus ./data/company.json --use-model --vector-index memory \
//!     --title "Login" --description "cannot sign in" --json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use ai_llm_service::config::default_config::{
    base_model_prefix, config_ollama_chat, config_ollama_embedding,
};
use ai_llm_service::{HealthService, LlmSession, OllamaService, telemetry};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use knowledge_store::embed::ollama::OllamaEmbedder;
use knowledge_store::{
    DocumentStore, EmbeddingsProvider, InMemoryVectorIndex, JsonFileStore, QdrantConfig,
    QdrantVectorIndex, VectorIndex, index_corpus,
};
use reply_engine::{BagOfWordsEmbedder, EngineConfig, OllamaBackend, ReplyEngine, ReplyRequest};
use tracing::{Level, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum IndexKind {
    /// Keyword scoring only.
    None,
    /// Brute-force cosine index built at startup.
    Memory,
    /// Existing Qdrant collection.
    Qdrant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EmbedderKind {
    /// Offline hashed bag-of-words vectors.
    Bow,
    /// Ollama `/api/embeddings`.
    Ollama,
}

/// Draft a customer support reply for one ticket.
#[derive(Parser, Debug)]
#[command(name = "support-reply", version, about)]
struct Cli {
    /// Knowledge corpus: `.json` array or `.jsonl` rows.
    #[arg(long, env = "CORPUS_PATH", required_unless_present = "health")]
    corpus: Option<PathBuf>,

    /// Probe the chat model server, print its status as JSON and exit.
    #[arg(long)]
    health: bool,

    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long)]
    customer: Option<String>,

    #[arg(long)]
    ticket_id: Option<String>,

    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    priority: Option<String>,

    /// Offer the ticket to the local chat model before the relevance pipeline.
    #[arg(long, env = "USE_MODEL")]
    use_model: bool,

    #[arg(long, value_enum, default_value_t = IndexKind::None, env = "VECTOR_INDEX")]
    vector_index: IndexKind,

    #[arg(long, value_enum, default_value_t = EmbedderKind::Bow, env = "EMBEDDER")]
    embedder: EmbedderKind,

    /// Push the corpus into the Qdrant collection before answering.
    #[arg(long)]
    reindex: bool,

    /// Print the full reply as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }

    let cli = Cli::parse();
    telemetry::init("info", cli.log_level).context("failed to install tracing subscriber")?;

    if cli.health {
        let status = HealthService::new(None)?.check(&config_ollama_chat()?).await;
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    let Some(corpus) = cli.corpus.clone() else {
        anyhow::bail!("--corpus is required");
    };

    let cfg = EngineConfig::from_env();
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(corpus));
    let mut engine = ReplyEngine::new(store.clone(), cfg.clone());

    let session = if cli.use_model {
        connect_session().await
    } else {
        None
    };
    if let Some(session) = &session {
        engine = engine.with_backend(Arc::new(OllamaBackend::new(session.clone())));
    }

    if let Some(index) = build_index(&cli, &cfg, store.as_ref()).await? {
        engine = engine.with_vector_index(index);
    }

    let request = ReplyRequest {
        ticket_id: cli.ticket_id,
        title: Some(cli.title),
        description: Some(cli.description),
        customer_name: cli.customer,
        status: cli.status,
        priority: cli.priority,
        ..Default::default()
    };
    let outcome = engine.generate_reply(&request).await;

    if let Some(session) = &session {
        session.close().await;
    }

    let reply = outcome?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.reply_text);
    }
    Ok(())
}

/// Connects the chat session; `None` when the model server is unusable.
async fn connect_session() -> Option<Arc<LlmSession>> {
    let session = config_ollama_chat()
        .and_then(|cfg| LlmSession::new(cfg, base_model_prefix()))
        .map_err(|e| warn!(error = %e, "chat model config invalid, using relevance pipeline"))
        .ok()?;
    match session.connect().await {
        Ok(active) => {
            info!(model = %active.model, "chat model ready");
            Some(Arc::new(session))
        }
        Err(e) => {
            warn!(error = %e, "chat model unavailable, using relevance pipeline");
            None
        }
    }
}

fn build_embedder(kind: EmbedderKind, cfg: &EngineConfig) -> Result<Arc<dyn EmbeddingsProvider>> {
    let embedder: Arc<dyn EmbeddingsProvider> = match kind {
        EmbedderKind::Bow => Arc::new(BagOfWordsEmbedder::new(cfg.bow_dim)?),
        EmbedderKind::Ollama => {
            let svc = OllamaService::new(config_ollama_embedding()?)?;
            Arc::new(OllamaEmbedder::new(Arc::new(svc), None))
        }
    };
    info!(embedder = embedder.name(), "embedder selected");
    Ok(embedder)
}

async fn build_index(
    cli: &Cli,
    cfg: &EngineConfig,
    store: &dyn DocumentStore,
) -> Result<Option<Arc<dyn VectorIndex>>> {
    let index: Arc<dyn VectorIndex> = match cli.vector_index {
        IndexKind::None => return Ok(None),
        IndexKind::Memory => {
            let index = InMemoryVectorIndex::new(build_embedder(cli.embedder, cfg)?);
            let docs = store.list_all().await.context("failed to load corpus for indexing")?;
            let n = index_corpus(&index, &docs, &cfg.chunking).await?;
            info!(chunks = n, "in-memory vector index ready");
            Arc::new(index)
        }
        IndexKind::Qdrant => {
            let qcfg = QdrantConfig::from_env();
            let index = QdrantVectorIndex::new(&qcfg, build_embedder(cli.embedder, cfg)?)?;
            if cli.reindex {
                let docs = store.list_all().await.context("failed to load corpus for indexing")?;
                let n = index_corpus(&index, &docs, &cfg.chunking).await?;
                info!(chunks = n, collection = %qcfg.collection, "qdrant collection updated");
            }
            Arc::new(index)
        }
    };
    Ok(Some(index))
}
