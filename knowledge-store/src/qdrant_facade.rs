//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant calls go through this facade so the index code never touches
//! the builder API directly. Documents travel as payload fields
//! (`doc_id`, `name`, `content`, `description`, `type`).

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder, value::Kind,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{DistanceKind, QdrantConfig};
use crate::document::{Document, DocumentType};
use crate::errors::StoreError;

pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
    exact: bool,
}

impl QdrantFacade {
    /// Creates a new facade; validates the config first.
    pub fn new(cfg: &QdrantConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.url);
        if let Some(key) = &cfg.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
            exact: cfg.exact_search,
        })
    }

    /// Creates the collection with `size`-dimensional vectors if it is missing.
    pub async fn ensure_collection(&self, size: usize) -> Result<(), StoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(size as u64, distance)),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        info!(
            collection = %self.collection,
            size,
            distance = ?self.distance,
            "collection created"
        );
        Ok(())
    }

    /// Upserts one batch of `(document, vector)` pairs.
    pub async fn upsert(&self, batch: Vec<(Document, Vec<f32>)>) -> Result<usize, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let n = batch.len();
        let points: Vec<PointStruct> = batch
            .into_iter()
            .map(|(doc, vector)| {
                PointStruct::new(stable_uuid(&doc.id).to_string(), vector, document_payload(&doc))
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        debug!(collection = %self.collection, points = n, "upsert done");
        Ok(n)
    }

    /// Top-`k` documents closest to `vector`, best first.
    pub async fn search(&self, vector: Vec<f32>, k: u64) -> Result<Vec<(f32, Document)>, StoreError> {
        let mut builder = SearchPointsBuilder::new(&self.collection, vector, k).with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let out: Vec<(f32, Document)> = res
            .result
            .into_iter()
            .map(|p| (p.score, payload_to_document(p.payload)))
            .collect();
        debug!(collection = %self.collection, hits = out.len(), "search done");
        Ok(out)
    }
}

/// Deterministic UUIDv5 from a document/chunk id.
fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(Kind::StringValue(s.to_string())),
    }
}

fn document_payload(doc: &Document) -> HashMap<String, QValue> {
    let mut m = HashMap::new();
    m.insert("doc_id".to_string(), qstring(&doc.id));
    m.insert("name".to_string(), qstring(&doc.name));
    m.insert("content".to_string(), qstring(&doc.content));
    m.insert("description".to_string(), qstring(doc.description_or_empty()));
    m.insert("type".to_string(), qstring(doc.doc_type.as_str()));
    m
}

/// Rebuilds a document from payload fields; missing fields become empty.
fn payload_to_document(mut p: HashMap<String, QValue>) -> Document {
    let mut take = |key: &str| -> String {
        match p.remove(key).and_then(|v| v.kind) {
            Some(Kind::StringValue(s)) => s,
            Some(Kind::IntegerValue(i)) => i.to_string(),
            Some(Kind::DoubleValue(f)) => f.to_string(),
            Some(Kind::BoolValue(b)) => b.to_string(),
            _ => String::new(),
        }
    };

    let id = take("doc_id");
    let name = take("name");
    let content = take("content");
    let description = take("description");
    let doc_type = DocumentType::from_label(&take("type"));

    Document {
        id,
        name,
        content,
        description: (!description.is_empty()).then_some(description),
        doc_type,
    }
}
