//! In-memory vector store

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::knowledge::RetrievalFilter;
use crate::domain::retrieval::RetrievalResult;
use crate::domain::vector::{brute_force_search, VectorRecord, VectorStore};
use crate::domain::DomainError;

/// Process-local store scanned exhaustively on every search
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Vec<VectorRecord>>,
    dimensions: Option<usize>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject records whose embedding length differs from `dimensions`
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn insert_batch(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError> {
        if let Some(expected) = self.dimensions {
            if let Some(bad) = records.iter().find(|r| r.dimensions() != expected) {
                return Err(DomainError::dimension_mismatch(expected, bad.dimensions()));
            }
        }

        let count = records.len();
        self.records.write().await.extend(records);
        Ok(count)
    }

    async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.source_id != source_id);
        Ok(before - records.len())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok(before - records.len())
    }

    async fn search(
        &self,
        query: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RetrievalResult>, DomainError> {
        let records = self.records.read().await;
        Ok(brute_force_search(records.iter(), query, filter, top_k, min_score))
    }

    async fn count_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.source_id == source_id).count())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
