//! Document stores: the corpus source read once per request.
//!
//! - [`InMemoryStore`]: fixed snapshot, used by tests and embedding callers
//! - [`JsonFileStore`]: `.json` array or `.jsonl` rows, re-read on every call

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::BoxFuture;
use crate::document::Document;
use crate::errors::StoreError;

/// Source of the full knowledge corpus.
///
/// Implement this trait to plug in a database or remote service.
pub trait DocumentStore: Send + Sync {
    /// Returns every document currently in the corpus.
    fn list_all<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Document>, StoreError>>;
}

/// Immutable in-memory corpus.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    docs: Arc<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs: Arc::new(docs),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for InMemoryStore {
    fn list_all<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Document>, StoreError>> {
        Box::pin(async move { Ok(self.docs.as_ref().clone()) })
    }
}

/// Corpus backed by a JSON (array of documents) or JSONL (one document per line) file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn list_all<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Document>, StoreError>> {
        Box::pin(async move {
            let raw = tokio::fs::read_to_string(&self.path).await?;
            let mut docs = match self.path.extension().and_then(|e| e.to_str()) {
                Some("jsonl") | Some("ndjson") => parse_jsonl(&raw),
                Some("json") => parse_json_array(&raw)?,
                other => {
                    return Err(StoreError::Format(format!(
                        "expected .json or .jsonl, got {:?}",
                        other.unwrap_or("<none>")
                    )));
                }
            };
            assign_missing_ids(&mut docs);
            info!(path = ?self.path, count = docs.len(), "corpus loaded");
            Ok(docs)
        })
    }
}

/// Strict: the whole file must be an array of documents.
fn parse_json_array(raw: &str) -> Result<Vec<Document>, StoreError> {
    let docs: Vec<Document> = serde_json::from_str(raw)?;
    Ok(docs)
}

/// Tolerant: empty lines are skipped, malformed lines are logged and skipped.
fn parse_jsonl(raw: &str) -> Vec<Document> {
    let mut out = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line).and_then(serde_json::from_value::<Document>) {
            Ok(doc) => out.push(doc),
            Err(e) => warn!("Skipping malformed document on line {}: {}", i + 1, e),
        }
    }
    debug!("Loaded {} documents from JSONL", out.len());
    out
}

/// Documents without an id get their 1-based position.
fn assign_missing_ids(docs: &mut [Document]) {
    for (i, d) in docs.iter_mut().enumerate() {
        if d.id.trim().is_empty() {
            d.id = (i + 1).to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn in_memory_returns_snapshot_in_order() {
        let store = InMemoryStore::new(vec![
            Document::new("1", "A", "alpha"),
            Document::new("2", "B", "beta"),
        ]);
        let docs = store.list_all().await.expect("list");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "A");
        assert_eq!(docs[1].name, "B");
    }

    #[tokio::test]
    async fn reads_json_array() {
        let mut f = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("tmp");
        write!(
            f,
            r#"[{{"name":"Billing FAQ","content":"Q: How?\nA: Like this.","type":"faq"}},
               {{"id":"x","name":"Policy","content":"Refunds within 30 days","description":"refunds"}}]"#
        )
        .expect("write");

        let docs = JsonFileStore::new(f.path()).list_all().await.expect("list");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "1");
        assert_eq!(docs[1].id, "x");
        assert_eq!(docs[1].description.as_deref(), Some("refunds"));
    }

    #[tokio::test]
    async fn jsonl_skips_malformed_lines() {
        let mut f = tempfile::Builder::new()
            .suffix(".jsonl")
            .tempfile()
            .expect("tmp");
        writeln!(f, r#"{{"id":"a","name":"One","content":"first"}}"#).expect("write");
        writeln!(f).expect("write");
        writeln!(f, "{{not json").expect("write");
        writeln!(f, r#"{{"id":"b","name":"Two","content":"second"}}"#).expect("write");

        let docs = JsonFileStore::new(f.path()).list_all().await.expect("list");
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let f = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("tmp");
        let err = JsonFileStore::new(f.path()).list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = JsonFileStore::new("/definitely/not/here.json")
            .list_all()
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
