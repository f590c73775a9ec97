//! Vector searcher strategy

use std::fmt::Debug;

use async_trait::async_trait;

use super::result::RetrievalResult;
use crate::domain::knowledge::RetrievalFilter;
use crate::domain::DomainError;

/// Results of one search strategy, with the tier that produced them
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<RetrievalResult>,
    /// True when a fallback tier answered instead of the primary
    pub fallback: bool,
}

impl SearchOutcome {
    pub fn primary(results: Vec<RetrievalResult>) -> Self {
        Self {
            results,
            fallback: false,
        }
    }

    pub fn fallback(results: Vec<RetrievalResult>) -> Self {
        Self {
            results,
            fallback: true,
        }
    }
}

/// Similarity search strategy; decorators compose primary and fallback tiers
#[async_trait]
pub trait VectorSearcher: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// At most `top_k` results at or above `min_score`, sorted descending
    async fn search(
        &self,
        query_vector: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<SearchOutcome, DomainError>;
}
