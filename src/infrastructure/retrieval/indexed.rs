//! Searcher backed by the indexed vector store

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::knowledge::RetrievalFilter;
use crate::domain::retrieval::{
    sort_by_score, SearchOutcome, VectorSearcher, DEFAULT_CANDIDATE_MULTIPLIER,
};
use crate::domain::vector::VectorStore;
use crate::domain::DomainError;

/// Over-fetches `top_k * multiplier` candidates from the store, then trims
#[derive(Debug, Clone)]
pub struct IndexedSearcher {
    store: Arc<dyn VectorStore>,
    candidate_multiplier: usize,
}

impl IndexedSearcher {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self {
            store,
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
        }
    }

    pub fn with_candidate_multiplier(mut self, multiplier: usize) -> Self {
        self.candidate_multiplier = multiplier.max(1);
        self
    }
}

#[async_trait]
impl VectorSearcher for IndexedSearcher {
    fn name(&self) -> &'static str {
        "indexed"
    }

    async fn search(
        &self,
        query_vector: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<SearchOutcome, DomainError> {
        let candidates = top_k.saturating_mul(self.candidate_multiplier);

        let mut results = self
            .store
            .search(query_vector, filter, candidates, min_score)
            .await?;

        results.retain(|r| r.score >= min_score);
        sort_by_score(&mut results);
        results.truncate(top_k);

        Ok(SearchOutcome::primary(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vector::{MockVectorStore, VectorRecord};

    async fn store_with(records: Vec<VectorRecord>) -> Arc<MockVectorStore> {
        let store = Arc::new(MockVectorStore::new());
        store.insert_batch(records).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_trims_to_top_k() {
        let store = store_with(vec![
            VectorRecord::new("s", 0, "a", vec![1.0, 0.0]),
            VectorRecord::new("s", 1, "b", vec![0.9, 0.1]),
            VectorRecord::new("s", 2, "c", vec![0.5, 0.5]),
        ])
        .await;
        let searcher = IndexedSearcher::new(store);

        let outcome = searcher
            .search(&[1.0, 0.0], &RetrievalFilter::new(), 2, 0.0)
            .await
            .unwrap();

        assert!(!outcome.fallback);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].content, "a");
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let searcher = IndexedSearcher::new(Arc::new(MockVectorStore::new().with_failing_search()));

        let result = searcher
            .search(&[1.0], &RetrievalFilter::new(), 5, 0.0)
            .await;

        assert!(matches!(result, Err(DomainError::VectorStore { .. })));
    }
}
