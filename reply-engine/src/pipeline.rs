//! Request orchestration: generative short-circuit, candidate pool, branch
//! selection, composition and recording.

use std::sync::Arc;

use knowledge_store::{Document, DocumentStore, VectorIndex};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::api_types::{GeneratedReply, ReplyBranch, ReplyRequest, ReplySource};
use crate::backend::GenerativeBackend;
use crate::branch::select_reply;
use crate::cfg::EngineConfig;
use crate::composer::compose_acknowledgement;
use crate::error::ReplyError;
use crate::prompt::build_ticket_prompt;
use crate::query::Query;
use crate::recorder::{ConversationEntry, ConversationRecorder};
use crate::scorer::{best_loose_match, score_documents};

/// Reply engine with explicitly injected collaborators.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct ReplyEngine {
    store: Arc<dyn DocumentStore>,
    backend: Option<Arc<dyn GenerativeBackend>>,
    index: Option<Arc<dyn VectorIndex>>,
    recorder: Option<Arc<dyn ConversationRecorder>>,
    cfg: EngineConfig,
}

impl ReplyEngine {
    pub fn new(store: Arc<dyn DocumentStore>, cfg: EngineConfig) -> Self {
        Self {
            store,
            backend: None,
            index: None,
            recorder: None,
            cfg,
        }
    }

    /// Generative backend tried before the pipeline.
    pub fn with_backend(mut self, backend: Arc<dyn GenerativeBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Vector index used instead of the keyword scorer when it returns results.
    pub fn with_vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn ConversationRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Produces a reply for one ticket.
    ///
    /// Every collaborator failure degrades to a textual reply.
    ///
    /// # Errors
    /// Only [`ReplyError::InvalidQuery`], when title and description are blank.
    #[instrument(skip_all, fields(ticket = ?req.ticket_id))]
    pub async fn generate_reply(&self, req: &ReplyRequest) -> Result<GeneratedReply, ReplyError> {
        let query = Query::from_request(req)?;
        debug!(status = %query.status, priority = %query.priority, "query accepted");

        let reply = match self.try_backend(&query).await {
            Some(reply) => reply,
            None => self.run_pipeline(&query).await,
        };
        info!(branch = ?reply.branch, chars = reply.reply_text.len(), "reply ready");

        self.record(&query, &reply).await;
        Ok(reply)
    }

    async fn try_backend(&self, query: &Query) -> Option<GeneratedReply> {
        let backend = self.backend.as_ref()?;
        let prompt = build_ticket_prompt(query);

        match timeout(
            self.cfg.generation_timeout,
            backend.try_generate(&prompt, &self.cfg.generation),
        )
        .await
        {
            Ok(Ok(generated)) => {
                info!(model = %generated.model, "reply generated by model");
                Some(GeneratedReply {
                    reply_text: generated.text,
                    branch: ReplyBranch::Generated,
                    source: ReplySource::Model {
                        model: generated.model,
                    },
                })
            }
            Ok(Err(e)) => {
                warn!(error = %e, "generative backend failed, using relevance pipeline");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.cfg.generation_timeout.as_millis() as u64,
                    "generative backend timed out, using relevance pipeline"
                );
                None
            }
        }
    }

    async fn run_pipeline(&self, query: &Query) -> GeneratedReply {
        let corpus = match self.store.list_all().await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(error = %e, "document store failed, acknowledging request");
                return self.acknowledge(query).await;
            }
        };

        let candidates = self.candidate_pool(query, &corpus).await;
        let selection = select_reply(&candidates, query);
        GeneratedReply {
            reply_text: selection.render(query),
            branch: selection.branch,
            source: ReplySource::Pipeline,
        }
    }

    /// Vector results when available and non-empty, else the keyword top 5.
    async fn candidate_pool(&self, query: &Query, corpus: &[Document]) -> Vec<Document> {
        if let Some(index) = &self.index {
            let text = query.search_text();
            match timeout(
                self.cfg.vector_search_timeout,
                index.similarity_search(&text, self.cfg.vector_top_k),
            )
            .await
            {
                Ok(Ok(docs)) if !docs.is_empty() => {
                    info!(hits = docs.len(), "candidate pool from vector index");
                    return docs;
                }
                Ok(Ok(_)) => debug!("vector index returned nothing, using keyword scorer"),
                Ok(Err(e)) => warn!(error = %e, "vector search failed, using keyword scorer"),
                Err(_) => warn!(
                    timeout_ms = self.cfg.vector_search_timeout.as_millis() as u64,
                    "vector search timed out, using keyword scorer"
                ),
            }
        }

        let keywords = query.keywords();
        let scored = score_documents(corpus, &keywords);
        debug!(
            keywords = ?keywords,
            top = ?scored.iter().map(|s| (s.document.name.as_str(), s.score)).collect::<Vec<_>>(),
            "candidate pool from keyword scorer"
        );
        scored.into_iter().map(|s| s.document).collect()
    }

    /// Reply used when the corpus could not be read. Retries the store once.
    async fn acknowledge(&self, query: &Query) -> GeneratedReply {
        let helpful = match self.store.list_all().await {
            Ok(docs) => best_loose_match(&docs, &query.search_text()).map(|d| d.content.clone()),
            Err(e) => {
                warn!(error = %e, "document store retry failed");
                None
            }
        };
        GeneratedReply {
            reply_text: compose_acknowledgement(
                &query.customer_name,
                &query.display_title,
                helpful.as_deref(),
            ),
            branch: ReplyBranch::Acknowledgement,
            source: ReplySource::Pipeline,
        }
    }

    async fn record(&self, query: &Query, reply: &GeneratedReply) {
        let (Some(recorder), Some(ticket_id)) = (&self.recorder, &query.ticket_id) else {
            return;
        };
        let entry = ConversationEntry::assistant(ticket_id.clone(), reply.reply_text.clone(), reply.branch);
        match recorder.record(entry).await {
            Ok(()) => debug!(ticket = %ticket_id, "reply recorded"),
            Err(e) => warn!(ticket = %ticket_id, error = %e, "failed to record reply"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use knowledge_store::{
        BoxFuture, ChunkingConfig, InMemoryStore, InMemoryVectorIndex, StoreError, index_corpus,
    };

    use super::*;
    use crate::backend::{GeneratedText, GenerationParams};
    use crate::embedder::BagOfWordsEmbedder;
    use crate::error::BackendError;
    use crate::recorder::InMemoryConversationLog;

    fn billing_faq() -> Document {
        Document::new(
            "1",
            "Billing FAQ",
            "Q: How do I get a refund?\nA: Refunds are processed within 5 business days.\n\n\
             Q: What is your pricing?\nA: Plans start at $9.99/month.",
        )
    }

    fn request(title: &str, description: &str) -> ReplyRequest {
        ReplyRequest {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    fn engine(docs: Vec<Document>) -> ReplyEngine {
        ReplyEngine::new(Arc::new(InMemoryStore::new(docs)), EngineConfig::default())
    }

    struct FixedBackend(&'static str);

    impl GenerativeBackend for FixedBackend {
        fn try_generate<'a>(
            &'a self,
            _prompt: &'a str,
            _params: &'a GenerationParams,
        ) -> BoxFuture<'a, Result<GeneratedText, BackendError>> {
            Box::pin(async move {
                Ok(GeneratedText {
                    text: self.0.to_string(),
                    model: "fake-model".into(),
                })
            })
        }
    }

    struct FailingBackend;

    impl GenerativeBackend for FailingBackend {
        fn try_generate<'a>(
            &'a self,
            _prompt: &'a str,
            _params: &'a GenerationParams,
        ) -> BoxFuture<'a, Result<GeneratedText, BackendError>> {
            Box::pin(async { Err(BackendError::Unavailable("offline".into())) })
        }
    }

    struct SlowBackend;

    impl GenerativeBackend for SlowBackend {
        fn try_generate<'a>(
            &'a self,
            _prompt: &'a str,
            _params: &'a GenerationParams,
        ) -> BoxFuture<'a, Result<GeneratedText, BackendError>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(GeneratedText {
                    text: "too late".into(),
                    model: "slow".into(),
                })
            })
        }
    }

    /// Fails the first `fail_first` calls, then serves `docs`.
    struct FlakyStore {
        fail_first: usize,
        calls: AtomicUsize,
        docs: Vec<Document>,
    }

    impl DocumentStore for FlakyStore {
        fn list_all<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Document>, StoreError>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n < self.fail_first {
                    Err(StoreError::Format("store offline".into()))
                } else {
                    Ok(self.docs.clone())
                }
            })
        }
    }

    struct FixedIndex(Result<Vec<Document>, ()>);

    impl VectorIndex for FixedIndex {
        fn add_documents<'a>(&'a self, docs: Vec<Document>) -> BoxFuture<'a, Result<usize, StoreError>> {
            Box::pin(async move { Ok(docs.len()) })
        }

        fn similarity_search<'a>(
            &'a self,
            _query: &'a str,
            _k: usize,
        ) -> BoxFuture<'a, Result<Vec<Document>, StoreError>> {
            Box::pin(async move {
                self.0
                    .clone()
                    .map_err(|_| StoreError::Embedding("index down".into()))
            })
        }
    }

    struct BrokenRecorder;

    impl ConversationRecorder for BrokenRecorder {
        fn record<'a>(&'a self, _entry: ConversationEntry) -> BoxFuture<'a, Result<(), BackendError>> {
            Box::pin(async { Err(BackendError::Recording("disk full".into())) })
        }
    }

    #[tokio::test]
    async fn refund_faq_scenario() {
        let reply = engine(vec![billing_faq()])
            .generate_reply(&request("Refund request", "I want a refund for last month"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::FaqMatch);
        assert_eq!(reply.source, ReplySource::Pipeline);
        assert!(reply.reply_text.contains("Refunds are processed within 5 business days."));
        assert!(reply.reply_text.starts_with("Dear Customer,"));
    }

    #[tokio::test]
    async fn dark_mode_on_empty_corpus_asks_for_details() {
        let reply = engine(vec![])
            .generate_reply(&request("Dark mode", "please add a dark mode toggle"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::General);
        assert!(reply.reply_text.contains("could you please provide some additional details"));
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let err = engine(vec![billing_faq()])
            .generate_reply(&request("  ", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ReplyError::InvalidQuery));
    }

    #[tokio::test]
    async fn any_non_blank_query_gets_a_reply() {
        let corpora = vec![
            vec![],
            vec![billing_faq()],
            vec![
                Document::new("2", "Troubleshooting guide", "Restart the app to fix most errors."),
                Document::new("3", "Feature guide", "Export is a premium feature."),
            ],
        ];
        let queries = [
            request("", "app error on start"),
            request("Cancel plan", ""),
            request("Login", "cannot sign in to my account"),
            request("Export", "how to export data? is there an option"),
            request("Hello", "just saying thanks"),
        ];
        for docs in corpora {
            let e = engine(docs);
            for q in &queries {
                let reply = e.generate_reply(q).await.expect("reply");
                assert!(!reply.reply_text.trim().is_empty());
                assert!(reply.reply_text.ends_with("Best regards,\nSupport Team"));
            }
        }
    }

    #[tokio::test]
    async fn password_reset_without_documents_lists_steps() {
        let reply = engine(vec![])
            .generate_reply(&request("Password", "I forgot my password and need to reset it"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::PasswordReset);
        assert!(reply.reply_text.contains("5. Click the link and follow the instructions"));
    }

    #[tokio::test]
    async fn backend_reply_preempts_pipeline() {
        let reply = engine(vec![billing_faq()])
            .with_backend(Arc::new(FixedBackend("Hello from the model")))
            .generate_reply(&request("Refund request", "I want a refund"))
            .await
            .expect("reply");
        assert_eq!(reply.reply_text, "Hello from the model");
        assert_eq!(reply.branch, ReplyBranch::Generated);
        assert_eq!(
            reply.source,
            ReplySource::Model {
                model: "fake-model".into()
            }
        );
    }

    #[tokio::test]
    async fn backend_failure_falls_back() {
        let reply = engine(vec![billing_faq()])
            .with_backend(Arc::new(FailingBackend))
            .generate_reply(&request("Refund request", "I want a refund for last month"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::FaqMatch);
        assert_eq!(reply.source, ReplySource::Pipeline);
    }

    #[tokio::test]
    async fn backend_timeout_falls_back() {
        let cfg = EngineConfig {
            generation_timeout: Duration::from_millis(50),
            ..EngineConfig::default()
        };
        let reply = ReplyEngine::new(Arc::new(InMemoryStore::new(vec![billing_faq()])), cfg)
            .with_backend(Arc::new(SlowBackend))
            .generate_reply(&request("Refund request", "I want a refund for last month"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::FaqMatch);
    }

    #[tokio::test]
    async fn vector_results_replace_keyword_pool() {
        let from_index = Document::new("v1", "Refund policy", "Refunds go back to the original card.");
        let reply = engine(vec![billing_faq()])
            .with_vector_index(Arc::new(FixedIndex(Ok(vec![from_index]))))
            .generate_reply(&request("Money back", "I would like my money back"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::Refund);
        assert!(reply.reply_text.contains("Refunds go back to the original card."));
    }

    #[tokio::test]
    async fn empty_or_failing_index_uses_keyword_scorer() {
        for index in [FixedIndex(Ok(vec![])), FixedIndex(Err(()))] {
            let reply = engine(vec![billing_faq()])
                .with_vector_index(Arc::new(index))
                .generate_reply(&request("Refund request", "I want a refund for last month"))
                .await
                .expect("reply");
            assert_eq!(reply.branch, ReplyBranch::FaqMatch);
        }
    }

    #[tokio::test]
    async fn in_memory_index_with_bag_of_words_feeds_the_pool() {
        let docs = vec![
            billing_faq(),
            Document::new("2", "Shipping", "Orders ship within two days."),
        ];
        let embedder = Arc::new(BagOfWordsEmbedder::new(128).expect("embedder"));
        let index = Arc::new(InMemoryVectorIndex::new(embedder));
        let n = index_corpus(index.as_ref(), &docs, &ChunkingConfig::default())
            .await
            .expect("index");
        assert_eq!(n, 2);

        let reply = engine(docs)
            .with_vector_index(index)
            .generate_reply(&request("Refund request", "I want a refund for last month"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::FaqMatch);
        assert!(reply.reply_text.contains("Refunds are processed within 5 business days."));
    }

    #[tokio::test]
    async fn store_failure_acknowledges_with_retry_data() {
        let store = FlakyStore {
            fail_first: 1,
            calls: AtomicUsize::new(0),
            docs: vec![Document::new("1", "Login help", "Reset your login password here.")],
        };
        let reply = ReplyEngine::new(Arc::new(store), EngineConfig::default())
            .generate_reply(&request("Cannot login", "forgot password"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::Acknowledgement);
        assert!(reply.reply_text.contains(
            "you might find the following information helpful:\n\nReset your login password here."
        ));
    }

    #[tokio::test]
    async fn store_down_gives_plain_acknowledgement() {
        let store = FlakyStore {
            fail_first: usize::MAX,
            calls: AtomicUsize::new(0),
            docs: vec![],
        };
        let reply = ReplyEngine::new(Arc::new(store), EngineConfig::default())
            .generate_reply(&request("Cannot login", "forgot password"))
            .await
            .expect("reply");
        assert_eq!(reply.branch, ReplyBranch::Acknowledgement);
        assert!(reply.reply_text.contains("We have received your request"));
        assert!(!reply.reply_text.contains("While we prepare"));
    }

    #[tokio::test]
    async fn replies_with_ticket_id_are_recorded() {
        let log = Arc::new(InMemoryConversationLog::new());
        let e = engine(vec![billing_faq()]).with_recorder(log.clone());

        let mut req = request("Refund request", "I want a refund for last month");
        e.generate_reply(&req).await.expect("reply");
        assert!(log.entries().await.is_empty());

        req.ticket_id = Some("T-42".into());
        let reply = e.generate_reply(&req).await.expect("reply");
        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ticket_id, "T-42");
        assert_eq!(entries[0].author, "AI Assistant");
        assert_eq!(entries[0].content, reply.reply_text);
        assert_eq!(entries[0].branch, ReplyBranch::FaqMatch);
    }

    #[tokio::test]
    async fn recording_failure_does_not_fail_the_reply() {
        let mut req = request("Dark mode", "please add a dark mode toggle");
        req.ticket_id = Some("T-1".into());
        let reply = engine(vec![])
            .with_recorder(Arc::new(BrokenRecorder))
            .generate_reply(&req)
            .await;
        assert!(reply.is_ok());
    }
}
