//! Primary-then-fallback searcher decorator

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::knowledge::RetrievalFilter;
use crate::domain::retrieval::{SearchOutcome, VectorSearcher};
use crate::domain::DomainError;

/// Answers from `fallback` when `primary` errors, flagging the outcome
#[derive(Debug, Clone)]
pub struct FallbackSearcher {
    primary: Arc<dyn VectorSearcher>,
    fallback: Arc<dyn VectorSearcher>,
}

impl FallbackSearcher {
    pub fn new(primary: Arc<dyn VectorSearcher>, fallback: Arc<dyn VectorSearcher>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl VectorSearcher for FallbackSearcher {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn search(
        &self,
        query_vector: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<SearchOutcome, DomainError> {
        match self
            .primary
            .search(query_vector, filter, top_k, min_score)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "Primary search failed, falling back"
                );

                let outcome = self
                    .fallback
                    .search(query_vector, filter, top_k, min_score)
                    .await?;

                Ok(SearchOutcome::fallback(outcome.results))
            }
        }
    }
}
