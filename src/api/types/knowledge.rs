//! Request and response bodies of the knowledge endpoints

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ingestion::{IngestRequest, IngestionResult};
use crate::domain::knowledge::{EntryType, KnowledgeEntry, ScopeMetadata};
use crate::domain::rerank::RerankOptions;
use crate::domain::retrieval::{HybridQuery, RetrievalQuery};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCreatedResponse {
    pub id: String,
}

/// Entry as returned over HTTP; the raw embedding is left out
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub scope: ScopeMetadata,
    pub metadata: HashMap<String, serde_json::Value>,
    pub embedded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<KnowledgeEntry> for EntryResponse {
    fn from(entry: KnowledgeEntry) -> Self {
        Self {
            embedded: entry.embedding.is_some(),
            id: entry.id,
            entry_type: entry.entry_type,
            title: entry.title,
            content: entry.content,
            owner_id: entry.owner_id,
            parent_id: entry.parent_id,
            scope: entry.scope,
            metadata: entry.metadata,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub deleted: bool,
}

/// Body of `POST /v1/sources/{source_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct IngestSourceRequest {
    pub text: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub scope: ScopeMetadata,
    #[serde(default, rename = "type")]
    pub entry_type: Option<EntryType>,
    #[serde(default)]
    pub title: Option<String>,
}

impl IngestSourceRequest {
    pub fn into_ingest_request(self, source_id: String) -> IngestRequest {
        let mut request = IngestRequest::new(source_id, self.text)
            .with_owner_opt(self.owner_id)
            .with_scope(self.scope);
        if let Some(entry_type) = self.entry_type {
            request = request.with_entry_type(entry_type);
        }
        if let Some(title) = self.title {
            request = request.with_title(title);
        }
        request
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSourceResponse {
    pub source_id: String,
    pub records: usize,
    pub batches: usize,
}

impl From<IngestionResult> for IngestSourceResponse {
    fn from(result: IngestionResult) -> Self {
        Self {
            records: result.record_count(),
            batches: result.batches,
            source_id: result.source_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStatsResponse {
    pub source_id: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSourceResponse {
    pub deleted: usize,
}

/// Body of `POST /v1/retrieve`; omitted limits fall back to configured defaults
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub types: Vec<EntryType>,
    #[serde(default, alias = "entity_id")]
    pub scope_id: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f32>,
}

impl RetrieveRequest {
    pub fn into_query(self, default_top_k: usize, default_min_score: f32) -> RetrievalQuery {
        RetrievalQuery {
            query: self.query,
            owner_id: self.owner_id,
            types: self.types,
            scope_id: self.scope_id,
            top_k: self.top_k.unwrap_or(default_top_k),
            min_score: self.min_score.unwrap_or(default_min_score),
        }
    }
}

/// Body of `POST /v1/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub base: RetrieveRequest,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub rerank: RerankOptions,
}

impl SearchRequest {
    pub fn into_parts(self, default_top_k: usize, default_min_score: f32) -> (HybridQuery, RerankOptions) {
        let query = HybridQuery::new(self.base.into_query(default_top_k, default_min_score))
            .with_file_ids(self.file_ids);
        (query, self.rerank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_retrieve_request_defaults() {
        let request: RetrieveRequest =
            serde_json::from_value(json!({ "query": "revenue", "entity_id": "ds-1" })).unwrap();

        let query = request.into_query(7, 0.25);

        assert_eq!(query.top_k, 7);
        assert_eq!(query.min_score, 0.25);
        assert_eq!(query.scope_id.as_deref(), Some("ds-1"));
    }

    #[test]
    fn test_search_request_with_rerank() {
        let request: SearchRequest = serde_json::from_value(json!({
            "query": "churn",
            "top_k": 3,
            "types": ["question-answer", "file-chunk"],
            "file_ids": ["f1"],
            "rerank": { "enhanced": true, "weights": { "similarity": 0.5, "type_priority": 0.3, "recency": 0.2 } }
        }))
        .unwrap();

        let (query, options) = request.into_parts(10, 0.0);

        assert_eq!(query.base.top_k, 3);
        assert_eq!(query.base.types.len(), 2);
        assert_eq!(query.file_ids, vec!["f1".to_string()]);
        assert!(options.enhanced);
        assert_eq!(options.weights.map(|w| w.similarity), Some(0.5));
    }

    #[test]
    fn test_entry_response_hides_embedding() {
        let entry = KnowledgeEntry::new(EntryType::Synonym, "rev", "rev: revenue").with_embedding(vec![0.1; 4]);

        let json = serde_json::to_value(EntryResponse::from(entry)).unwrap();

        assert_eq!(json["embedded"], true);
        assert_eq!(json["type"], "synonym");
        assert!(json.get("embedding").is_none());
    }

    #[test]
    fn test_ingest_source_request_conversion() {
        let request: IngestSourceRequest = serde_json::from_value(json!({
            "text": "body",
            "owner_id": "u1",
            "type": "business-document",
            "scope": { "entity_id": "ds-9" }
        }))
        .unwrap();

        let ingest = request.into_ingest_request("doc-1".to_string());

        assert_eq!(ingest.source_id, "doc-1");
        assert_eq!(ingest.entry_type, EntryType::BusinessDocument);
        assert_eq!(ingest.scope.scope_id.as_deref(), Some("ds-9"));
    }
}
