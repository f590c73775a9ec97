//! Brute-force scan over the knowledge record store

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::knowledge::{KnowledgeRecordStore, RetrievalFilter};
use crate::domain::retrieval::{sort_by_score, RetrievalResult, SearchOutcome, VectorSearcher};
use crate::domain::vector::cosine_similarity;
use crate::domain::DomainError;

/// Loads every entry matching the scalar filters and scores it in-process
///
/// Entries without a stored embedding are skipped.
#[derive(Debug, Clone)]
pub struct ScanSearcher {
    records: Arc<dyn KnowledgeRecordStore>,
}

impl ScanSearcher {
    pub fn new(records: Arc<dyn KnowledgeRecordStore>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl VectorSearcher for ScanSearcher {
    fn name(&self) -> &'static str {
        "scan"
    }

    async fn search(
        &self,
        query_vector: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<SearchOutcome, DomainError> {
        let entries = self.records.find(filter).await?;
        let scanned = entries.len();

        let mut results: Vec<RetrievalResult> = entries
            .iter()
            .filter_map(|entry| {
                let embedding = entry.embedding.as_deref()?;
                if embedding.len() != query_vector.len() {
                    return None;
                }
                let score = cosine_similarity(query_vector, embedding);
                (score >= min_score).then(|| RetrievalResult::from_entry(entry, score))
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(top_k);

        tracing::debug!(scanned, matched = results.len(), "Brute-force scan completed");

        Ok(SearchOutcome::primary(results))
    }
}
