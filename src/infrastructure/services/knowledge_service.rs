//! Knowledge service - entry lifecycle, file ingestion and search

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::embedding::Embedder;
use crate::domain::ingestion::{IngestRequest, IngestionResult};
use crate::domain::knowledge::{
    validate_entry_id, validate_source_id, EntryPayload, EntryType, KnowledgeEntry,
    KnowledgeRecordStore, ScopeMetadata,
};
use crate::domain::rerank::RerankOptions;
use crate::domain::retrieval::{HybridQuery, RetrievalQuery, RetrievalResponse, MAX_TOP_K};
use crate::domain::vector::{VectorRecord, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::IngestionPipeline;
use crate::infrastructure::rerank::Reranker;
use crate::infrastructure::retrieval::RetrievalService;

/// Request to add a single knowledge entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEntryRequest {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub payload: serde_json::Value,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub scope: ScopeMetadata,
}

impl AddEntryRequest {
    pub fn new(entry_type: EntryType, payload: serde_json::Value) -> Self {
        Self {
            entry_type,
            payload,
            owner_id: None,
            parent_id: None,
            scope: ScopeMetadata::default(),
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_scope(mut self, scope: ScopeMetadata) -> Self {
        self.scope = scope;
        self
    }
}

/// Front door of the engine
///
/// The record store and the vector store are written independently; there is no
/// transaction spanning both.
#[derive(Debug, Clone)]
pub struct KnowledgeService {
    embedder: Embedder,
    records: Arc<dyn KnowledgeRecordStore>,
    vectors: Arc<dyn VectorStore>,
    pipeline: IngestionPipeline,
    retrieval: RetrievalService,
    reranker: Reranker,
}

impl KnowledgeService {
    pub fn new(
        embedder: Embedder,
        records: Arc<dyn KnowledgeRecordStore>,
        vectors: Arc<dyn VectorStore>,
        pipeline: IngestionPipeline,
        retrieval: RetrievalService,
    ) -> Self {
        Self {
            embedder,
            records,
            vectors,
            pipeline,
            retrieval,
            reranker: Reranker::disabled(),
        }
    }

    pub fn with_reranker(mut self, reranker: Reranker) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }

    /// Validate, embed, persist and index one entry
    pub async fn add_entry(&self, request: AddEntryRequest) -> Result<KnowledgeEntry, DomainError> {
        let payload = EntryPayload::parse(request.entry_type, request.payload)?;

        if let Some(ref parent_id) = request.parent_id {
            validate_entry_id(parent_id)?;
            if self.records.get(parent_id).await?.is_none() {
                return Err(DomainError::validation(format!(
                    "Parent entry '{}' does not exist",
                    parent_id
                )));
            }
        }

        let mut entry = KnowledgeEntry::new(payload.entry_type(), payload.title(), payload.content())
            .with_owner_opt(request.owner_id)
            .with_scope(request.scope)
            .with_metadata(payload.metadata());
        if let Some(parent_id) = request.parent_id {
            entry = entry.with_parent(parent_id);
        }
        // Record and vector are filed under the same source key
        match entry.scope.source_id {
            Some(ref source_id) => validate_source_id(source_id)?,
            None => entry.scope.source_id = Some(entry.id.clone()),
        }

        let embedding = self.embedder.embed_text(&entry.embeddable_text()).await?;
        entry = entry.with_embedding(embedding.clone());

        let stored = self.records.insert(entry).await?;

        if let Err(e) = self.vectors.insert_batch(vec![entry_record(&stored, embedding)]).await {
            tracing::warn!(entry_id = %stored.id, error = %e, "Indexing entry failed, removing record");
            if let Err(cleanup) = self.records.delete(&stored.id).await {
                tracing::error!(
                    entry_id = %stored.id,
                    error = %cleanup,
                    "Could not remove unindexed entry"
                );
            }
            return Err(e);
        }

        tracing::info!(
            entry_id = %stored.id,
            entry_type = %stored.entry_type,
            "Knowledge entry added"
        );

        Ok(stored)
    }

    pub async fn get_entry(&self, id: &str) -> Result<KnowledgeEntry, DomainError> {
        validate_entry_id(id)?;

        self.records
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Knowledge entry '{}' not found", id)))
    }

    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<KnowledgeEntry>, DomainError> {
        validate_entry_id(parent_id)?;
        self.records.list_children(parent_id).await
    }

    /// Delete an entry, its descendants and their vectors; false when it did not exist
    pub async fn delete_entry(&self, id: &str) -> Result<bool, DomainError> {
        validate_entry_id(id)?;

        if self.records.get(id).await?.is_none() {
            return Ok(false);
        }

        let mut doomed = vec![id.to_string()];
        let mut seen: HashSet<String> = doomed.iter().cloned().collect();
        let mut cursor = 0;
        while cursor < doomed.len() {
            let children = self.records.list_children(&doomed[cursor]).await?;
            for child in children {
                if seen.insert(child.id.clone()) {
                    doomed.push(child.id);
                }
            }
            cursor += 1;
        }

        // Children first so a failure never leaves an orphan behind a deleted parent
        for entry_id in doomed.iter().rev() {
            self.vectors.delete_by_ids(std::slice::from_ref(entry_id)).await?;
            self.records.delete(entry_id).await?;
        }

        tracing::info!(entry_id = %id, removed = doomed.len(), "Knowledge entry deleted");

        Ok(true)
    }

    /// Ingest a document and mirror its chunks into the record store
    pub async fn ingest_file(&self, request: IngestRequest) -> Result<IngestionResult, DomainError> {
        let scope = request.scope.clone();
        let result = self.pipeline.ingest(request).await?;

        let entries: Vec<KnowledgeEntry> = result
            .records
            .iter()
            .map(|record| chunk_entry(record, &scope))
            .collect();

        let mirrored = async {
            self.records.delete_by_source(&result.source_id).await?;
            self.records.insert_many(entries).await
        };

        if let Err(e) = mirrored.await {
            tracing::warn!(
                source_id = %result.source_id,
                error = %e,
                "Chunks indexed but not mirrored into the record store"
            );
        }

        Ok(result)
    }

    /// Remove every vector and record of a source; succeeds when nothing is left to delete
    pub async fn delete_source(&self, source_id: &str) -> Result<usize, DomainError> {
        validate_source_id(source_id)?;

        let vectors = self.vectors.delete_by_source(source_id).await?;
        let records = self.records.delete_by_source(source_id).await?;

        tracing::info!(source_id = %source_id, vectors, records, "Source deleted");

        Ok(vectors)
    }

    pub async fn count_source(&self, source_id: &str) -> Result<usize, DomainError> {
        validate_source_id(source_id)?;
        self.vectors.count_by_source(source_id).await
    }

    pub async fn retrieve(&self, query: &RetrievalQuery) -> Result<RetrievalResponse, DomainError> {
        self.retrieval.retrieve(query).await
    }

    pub async fn hybrid_retrieve(&self, query: &HybridQuery) -> Result<RetrievalResponse, DomainError> {
        self.retrieval.hybrid_retrieve(query).await
    }

    /// Hybrid retrieval followed by reranking
    pub async fn search(
        &self,
        query: &HybridQuery,
        options: &RerankOptions,
    ) -> Result<RetrievalResponse, DomainError> {
        let top_k = options.top_k.unwrap_or(query.base.top_k);
        if top_k == 0 || top_k > MAX_TOP_K {
            return Err(DomainError::validation(format!(
                "top_k must be between 1 and {}, got {}",
                MAX_TOP_K, top_k
            )));
        }

        let mut widened;
        let query = if top_k == query.base.top_k {
            query
        } else {
            widened = query.clone();
            widened.base.top_k = top_k;
            &widened
        };

        let mut response = self.retrieval.hybrid_retrieve(query).await?;
        if response.embedding_failed {
            return Ok(response);
        }

        let candidates = std::mem::take(&mut response.results);
        let outcome = self
            .reranker
            .rerank(&query.base.query, candidates, top_k, options)
            .await;

        response.reranked = outcome.reranked;
        Ok(response.with_results(outcome.results))
    }

    pub async fn health_check(&self) -> Result<bool, DomainError> {
        self.vectors.health_check().await
    }
}

fn entry_record(entry: &KnowledgeEntry, embedding: Vec<f32>) -> VectorRecord {
    let mut metadata = entry.scope.to_json_map();
    metadata.extend(entry.metadata.clone());
    metadata.insert("entry_id".to_string(), serde_json::json!(entry.id));

    let source_id = entry.scope.source_id.as_deref().unwrap_or(&entry.id);

    VectorRecord::new(source_id, 0, entry.embeddable_text(), embedding)
        .with_id(&entry.id)
        .with_owner(entry.owner_id.clone())
        .with_scope_id(entry.scope.scope_id.clone())
        .with_entry_type(entry.entry_type)
        .with_title(&entry.title)
        .with_metadata(metadata)
        .with_created_at(entry.created_at)
}

fn chunk_entry(record: &VectorRecord, scope: &ScopeMetadata) -> KnowledgeEntry {
    let mut scope = scope.clone().with_source_id(&record.source_id).with_chunk_index(record.chunk_index);
    if scope.file_id.is_none() {
        scope.file_id = Some(record.source_id.clone());
    }

    KnowledgeEntry::new(record.entry_type, &record.title, &record.content)
        .with_id(&record.id)
        .with_owner_opt(record.owner_id.clone())
        .with_scope(scope)
        .with_metadata(record.metadata.clone())
        .with_embedding(record.embedding.clone())
        .with_created_at(record.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::ingestion::{ChunkingConfig, IngestionConfig};
    use crate::domain::knowledge::{MockKnowledgeRecordStore, RetrievalFilter};
    use crate::domain::rerank::MockRerankModel;
    use crate::domain::retrieval::{FileChunkMatch, MockFileRetriever};
    use crate::domain::vector::MockVectorStore;
    use crate::infrastructure::embedding::HashingEmbeddingProvider;
    use crate::infrastructure::ingestion::RecursiveCharacterChunker;
    use crate::infrastructure::knowledge::InMemoryKnowledgeRecordStore;
    use crate::infrastructure::retrieval::RetrievalFactory;
    use crate::infrastructure::vector_store::InMemoryVectorStore;
    use crate::config::RetrievalSettings;
    use serde_json::json;

    const DIMS: usize = 64;

    struct Fixture {
        service: KnowledgeService,
        records: Arc<InMemoryKnowledgeRecordStore>,
        vectors: Arc<dyn VectorStore>,
    }

    fn hashing_embedder() -> Embedder {
        Embedder::new(
            Arc::new(HashingEmbeddingProvider::new(DIMS).unwrap()),
            "feature-hash-v1",
            DIMS,
        )
    }

    fn build(embedder: Embedder, vectors: Arc<dyn VectorStore>) -> Fixture {
        let records = Arc::new(InMemoryKnowledgeRecordStore::new());
        let pipeline = IngestionPipeline::new(
            Arc::new(RecursiveCharacterChunker::new()),
            embedder.clone(),
            vectors.clone(),
            IngestionConfig::new(ChunkingConfig::new(40, 5), 2),
        )
        .unwrap();
        let searcher = RetrievalFactory::create_searcher(
            &RetrievalSettings::default(),
            vectors.clone(),
            records.clone(),
        );
        let retrieval = RetrievalService::new(embedder.clone(), searcher);
        let service = KnowledgeService::new(embedder, records.clone(), vectors.clone(), pipeline, retrieval);

        Fixture {
            service,
            records,
            vectors,
        }
    }

    fn fixture() -> Fixture {
        build(hashing_embedder(), Arc::new(InMemoryVectorStore::new()))
    }

    fn qa(question: &str, answer: &str) -> AddEntryRequest {
        AddEntryRequest::new(
            EntryType::QuestionAnswer,
            json!({ "question": question, "answer": answer }),
        )
    }

    fn schema(database: &str, table: Option<&str>) -> AddEntryRequest {
        let mut payload = json!({ "database": database, "description": format!("{} schema", database) });
        if let Some(table) = table {
            payload["table"] = json!(table);
        }
        AddEntryRequest::new(EntryType::SchemaDescription, payload)
    }

    const DOCUMENT: &str = "Revenue is reported monthly by the finance team.\n\n\
        Churn is measured as cancelled subscriptions over active ones.\n\n\
        Active users log in at least once in thirty days.";

    #[tokio::test]
    async fn test_add_entry_persists_and_indexes() {
        let fx = fixture();

        let entry = fx
            .service
            .add_entry(qa("How is churn computed?", "Cancelled over active").with_owner("u1"))
            .await
            .unwrap();

        assert_eq!(entry.title, "How is churn computed?");
        assert_eq!(entry.embedding.as_ref().map(Vec::len), Some(DIMS));
        assert_eq!(fx.records.len().await, 1);
        assert_eq!(fx.vectors.count_by_source(&entry.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_entry_rejects_bad_payload() {
        let fx = fixture();

        let result = fx
            .service
            .add_entry(AddEntryRequest::new(EntryType::Synonym, json!({ "term": "rev" })))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(fx.records.len().await, 0);
    }

    #[tokio::test]
    async fn test_add_entry_requires_existing_parent() {
        let fx = fixture();

        let result = fx
            .service
            .add_entry(schema("sales", Some("orders")).with_parent("missing-db"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_add_entry_embedding_failure_persists_nothing() {
        let embedder = Embedder::new(
            Arc::new(MockEmbeddingProvider::new("mock", DIMS).with_error("model missing")),
            "mock",
            DIMS,
        );
        let fx = build(embedder, Arc::new(InMemoryVectorStore::new()));

        let result = fx.service.add_entry(qa("q?", "a")).await;

        assert!(result.is_err());
        assert_eq!(fx.records.len().await, 0);
    }

    #[tokio::test]
    async fn test_add_entry_index_failure_removes_record() {
        let fx = build(hashing_embedder(), Arc::new(MockVectorStore::new().with_failing_insert(1)));

        let result = fx.service.add_entry(qa("q?", "a")).await;

        assert!(matches!(result, Err(DomainError::VectorStore { .. })));
        assert_eq!(fx.records.len().await, 0);
    }

    #[tokio::test]
    async fn test_get_entry_not_found() {
        let fx = fixture();

        let result = fx.service.get_entry("nope").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_entry_cascades_to_children() {
        let fx = fixture();
        let db = fx.service.add_entry(schema("sales", None)).await.unwrap();
        let table = fx
            .service
            .add_entry(schema("sales", Some("orders")).with_parent(&db.id))
            .await
            .unwrap();
        let unrelated = fx.service.add_entry(qa("q?", "a")).await.unwrap();

        assert_eq!(fx.service.list_children(&db.id).await.unwrap().len(), 1);
        assert!(fx.service.delete_entry(&db.id).await.unwrap());

        assert!(fx.service.get_entry(&table.id).await.is_err());
        assert_eq!(fx.vectors.count_by_source(&table.id).await.unwrap(), 0);
        assert_eq!(fx.vectors.count_by_source(&db.id).await.unwrap(), 0);
        assert!(fx.service.get_entry(&unrelated.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_entry_returns_false() {
        let fx = fixture();

        assert!(!fx.service.delete_entry("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_mirrored_chunk_entry_removes_its_vector() {
        let fx = fixture();
        fx.service.ingest_file(IngestRequest::new("doc-1", DOCUMENT)).await.unwrap();
        let chunks = fx
            .records
            .find(&RetrievalFilter::new().with_source("doc-1"))
            .await
            .unwrap();
        let doomed = chunks[0].clone();
        let before = fx.service.count_source("doc-1").await.unwrap();

        assert!(fx.service.delete_entry(&doomed.id).await.unwrap());

        assert_eq!(fx.service.count_source("doc-1").await.unwrap(), before - 1);
        let response = fx
            .service
            .retrieve(&RetrievalQuery::new(doomed.content.clone()))
            .await
            .unwrap();
        assert!(response.results.iter().all(|r| r.id != doomed.id));
    }

    #[tokio::test]
    async fn test_entry_with_explicit_source_is_removed_by_delete_source() {
        let fx = fixture();
        let entry = fx
            .service
            .add_entry(qa("What is churn?", "Lost customers").with_scope(ScopeMetadata::new().with_source_id("s1")))
            .await
            .unwrap();

        assert_eq!(fx.service.count_source("s1").await.unwrap(), 1);
        let found = fx.service.retrieve(&RetrievalQuery::new("What is churn?")).await.unwrap();
        assert_eq!(found.results[0].id, entry.id);
        assert_eq!(found.results[0].source_id, "s1");

        assert_eq!(fx.service.delete_source("s1").await.unwrap(), 1);

        assert_eq!(fx.records.len().await, 0);
        let response = fx.service.retrieve(&RetrievalQuery::new("What is churn?")).await.unwrap();
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_add_entry_rejects_empty_source_id() {
        let fx = fixture();

        let result = fx
            .service
            .add_entry(qa("q?", "a").with_scope(ScopeMetadata::new().with_source_id("")))
            .await;

        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
        assert_eq!(fx.records.len().await, 0);
    }

    #[tokio::test]
    async fn test_entry_without_source_is_keyed_by_its_id() {
        let fx = fixture();

        let entry = fx.service.add_entry(qa("q?", "a")).await.unwrap();

        assert_eq!(entry.scope.source_id.as_deref(), Some(entry.id.as_str()));
        assert_eq!(fx.service.delete_source(&entry.id).await.unwrap(), 1);
        assert!(fx.service.get_entry(&entry.id).await.is_err());
    }

    #[tokio::test]
    async fn test_ingest_file_mirrors_chunks() {
        let fx = fixture();

        let result = fx
            .service
            .ingest_file(IngestRequest::new("doc-1", DOCUMENT).with_owner("u1"))
            .await
            .unwrap();

        assert!(result.records_created > 1);
        let mirrored = fx
            .records
            .find(&RetrievalFilter::new().with_source("doc-1"))
            .await
            .unwrap();
        assert_eq!(mirrored.len(), result.records_created);
        assert!(mirrored.iter().all(|e| e.scope.file_id.as_deref() == Some("doc-1")));
        assert!(mirrored.iter().all(|e| e.embedding.is_some()));
    }

    #[tokio::test]
    async fn test_reingest_replaces_records() {
        let fx = fixture();

        let first = fx.service.ingest_file(IngestRequest::new("doc-1", DOCUMENT)).await.unwrap();
        let second = fx.service.ingest_file(IngestRequest::new("doc-1", DOCUMENT)).await.unwrap();

        assert_eq!(first.records_created, second.records_created);
        assert_eq!(fx.service.count_source("doc-1").await.unwrap(), second.records_created);
        assert_eq!(fx.records.len().await, second.records_created);
    }

    #[tokio::test]
    async fn test_delete_source_is_idempotent() {
        let fx = fixture();
        fx.service.ingest_file(IngestRequest::new("doc-1", DOCUMENT)).await.unwrap();

        let removed = fx.service.delete_source("doc-1").await.unwrap();
        let again = fx.service.delete_source("doc-1").await.unwrap();

        assert!(removed > 0);
        assert_eq!(again, 0);
        assert_eq!(fx.records.len().await, 0);
    }

    #[tokio::test]
    async fn test_exact_text_round_trip() {
        let fx = fixture();
        let entry = fx
            .service
            .add_entry(AddEntryRequest::new(
                EntryType::BusinessDocument,
                json!({ "title": "Churn", "body": "Churn is cancelled subscriptions over active ones" }),
            ))
            .await
            .unwrap();
        fx.service.add_entry(qa("What is revenue?", "Money in")).await.unwrap();

        let response = fx
            .service
            .retrieve(&RetrievalQuery::new(entry.embeddable_text()))
            .await
            .unwrap();

        assert_eq!(response.results[0].id, entry.id);
        assert!((response.results[0].score - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_retrieve_on_empty_store() {
        let fx = fixture();

        let response = fx.service.retrieve(&RetrievalQuery::new("anything")).await.unwrap();

        assert!(response.results.is_empty());
        assert_eq!(response.total, 0);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_scan_when_index_is_down() {
        let vectors = Arc::new(MockVectorStore::new());
        let fx = build(hashing_embedder(), vectors.clone());
        let entry = fx.service.add_entry(qa("What is churn?", "Lost customers")).await.unwrap();

        let failing: Arc<dyn VectorStore> = Arc::new(MockVectorStore::new().with_failing_search());
        let searcher = RetrievalFactory::create_searcher(
            &RetrievalSettings::default(),
            failing,
            fx.records.clone(),
        );
        let retrieval = RetrievalService::new(hashing_embedder(), searcher);
        let pipeline = IngestionPipeline::new(
            Arc::new(RecursiveCharacterChunker::new()),
            hashing_embedder(),
            vectors.clone(),
            IngestionConfig::default(),
        )
        .unwrap();
        let service = KnowledgeService::new(
            hashing_embedder(),
            fx.records.clone(),
            vectors,
            pipeline,
            retrieval,
        );

        let response = service
            .search(&HybridQuery::new(RetrievalQuery::new("What is churn?")), &RerankOptions::base())
            .await
            .unwrap();

        assert!(response.fallback);
        assert!(!response.reranked);
        assert_eq!(response.results[0].id, entry.id);
    }

    #[tokio::test]
    async fn test_search_reranks_hybrid_results() {
        let records: Arc<dyn KnowledgeRecordStore> = Arc::new(MockKnowledgeRecordStore::new());
        let vectors: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
        let embedder = hashing_embedder();
        let files = MockFileRetriever::new().with_file(
            "report",
            vec![
                FileChunkMatch::new("chunk about revenue", 0.2),
                FileChunkMatch::new("chunk about churn", 0.3),
            ],
        );
        let retrieval = RetrievalService::new(
            embedder.clone(),
            RetrievalFactory::create_searcher(&RetrievalSettings::default(), vectors.clone(), records.clone()),
        )
        .with_file_retriever(Arc::new(files));
        let pipeline = IngestionPipeline::new(
            Arc::new(RecursiveCharacterChunker::new()),
            embedder.clone(),
            vectors.clone(),
            IngestionConfig::default(),
        )
        .unwrap();
        let model = MockRerankModel::new()
            .with_score("chunk about revenue", 0.1)
            .with_score("chunk about churn", 0.9);
        let service = KnowledgeService::new(embedder, records, vectors, pipeline, retrieval)
            .with_reranker(Reranker::new(Arc::new(model)));

        let query = HybridQuery::new(RetrievalQuery::new("churn")).with_file_ids(vec!["report".to_string()]);
        let response = service.search(&query, &RerankOptions::base()).await.unwrap();

        assert!(response.reranked);
        assert_eq!(response.results[0].content, "chunk about churn");
        assert_eq!(response.results[0].rank, Some(1));
        assert_eq!(response.total, 2);
    }

    #[tokio::test]
    async fn test_search_rejects_zero_top_k_override() {
        let fx = fixture();

        let result = fx
            .service
            .search(
                &HybridQuery::new(RetrievalQuery::new("q")),
                &RerankOptions::base().with_top_k(0),
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_search_top_k_override_can_widen_results() {
        let fx = fixture();
        for (question, answer) in [
            ("What is churn?", "Lost customers"),
            ("What is revenue?", "Money in"),
            ("What is an active user?", "Logged in this month"),
        ] {
            fx.service.add_entry(qa(question, answer)).await.unwrap();
        }

        let query = HybridQuery::new(RetrievalQuery::new("What is churn?").with_top_k(1).with_min_score(-1.0));
        let response = fx
            .service
            .search(&query, &RerankOptions::base().with_top_k(3))
            .await
            .unwrap();

        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[2].rank, Some(3));
    }

    #[tokio::test]
    async fn test_health_check_reports_store() {
        let fx = fixture();

        assert!(fx.service.health_check().await.unwrap());
    }
}
