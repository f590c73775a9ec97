//! Vector store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::record::VectorRecord;
use super::similarity::cosine_similarity;
use crate::domain::knowledge::RetrievalFilter;
use crate::domain::retrieval::{sort_by_score, RetrievalResult};
use crate::domain::DomainError;

/// Persistent index of vector records
///
/// Implementations raise on backend failure; deciding on a fallback is the caller's job.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    fn backend_name(&self) -> &'static str;

    /// Append records. No dedup: callers delete by source first for replacement.
    async fn insert_batch(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError>;

    /// Remove every record of an ingestion unit. Idempotent; returns rows removed.
    async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError>;

    /// Remove individual records by id, whatever source they belong to. Idempotent.
    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, DomainError>;

    /// Records sorted by descending similarity, at or above `min_score`, at most `top_k`
    async fn search(
        &self,
        query: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RetrievalResult>, DomainError>;

    async fn count_by_source(&self, source_id: &str) -> Result<usize, DomainError>;

    async fn health_check(&self) -> Result<bool, DomainError>;
}

/// Exhaustive cosine scan over records, shared by in-process backends
pub fn brute_force_search<'a>(
    records: impl IntoIterator<Item = &'a VectorRecord>,
    query: &[f32],
    filter: &RetrievalFilter,
    top_k: usize,
    min_score: f32,
) -> Vec<RetrievalResult> {
    let mut results: Vec<RetrievalResult> = records
        .into_iter()
        .filter(|record| record.matches(filter))
        .filter_map(|record| {
            let score = cosine_similarity(query, &record.embedding);
            (score >= min_score).then(|| RetrievalResult::from_record(record, score))
        })
        .collect();

    sort_by_score(&mut results);
    results.truncate(top_k);
    results
}
