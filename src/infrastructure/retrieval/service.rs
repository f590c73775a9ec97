//! Retrieval service - single-source and hybrid queries

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use super::files::{DisabledFileRetriever, FileQueryOutcome, ResilientFileRetriever};
use crate::domain::embedding::Embedder;
use crate::domain::knowledge::{EntryType, RetrievalFilter};
use crate::domain::retrieval::{
    assign_ranks, sort_by_score, FileRetriever, HybridConfig, HybridQuery, RetrievalQuery,
    RetrievalResponse, RetrievalResult, SearchOutcome, VectorSearcher,
};
use crate::domain::DomainError;

/// Embeds queries and runs them against the knowledge base and external files
#[derive(Debug, Clone)]
pub struct RetrievalService {
    embedder: Embedder,
    searcher: Arc<dyn VectorSearcher>,
    files: ResilientFileRetriever,
    hybrid: HybridConfig,
}

impl RetrievalService {
    pub fn new(embedder: Embedder, searcher: Arc<dyn VectorSearcher>) -> Self {
        Self {
            embedder,
            searcher,
            files: ResilientFileRetriever::new(Arc::new(DisabledFileRetriever)),
            hybrid: HybridConfig::default(),
        }
    }

    pub fn with_file_retriever(mut self, files: Arc<dyn FileRetriever>) -> Self {
        self.files = ResilientFileRetriever::new(files);
        self
    }

    pub fn with_hybrid_config(mut self, hybrid: HybridConfig) -> Result<Self, DomainError> {
        hybrid.validate()?;
        self.hybrid = hybrid;
        Ok(self)
    }

    pub fn hybrid_config(&self) -> &HybridConfig {
        &self.hybrid
    }

    /// Query the knowledge base alone
    ///
    /// Invalid queries are rejected; backend trouble degrades to flagged, possibly empty
    /// responses.
    pub async fn retrieve(&self, query: &RetrievalQuery) -> Result<RetrievalResponse, DomainError> {
        query.validate()?;

        let Some(outcome) = self
            .search_knowledge(&query.query, &query.filter(), query.top_k, query.min_score)
            .await
        else {
            return Ok(RetrievalResponse::embedding_failed());
        };

        let mut results = outcome.results;
        sort_by_score(&mut results);
        results.truncate(query.top_k);
        assign_ranks(&mut results);

        tracing::debug!(
            results = results.len(),
            fallback = outcome.fallback,
            "Knowledge retrieval completed"
        );

        Ok(RetrievalResponse::new(results).with_fallback(outcome.fallback))
    }

    /// Fuse knowledge base results with chunks of the given files
    ///
    /// The knowledge base gets `ceil(top_k * ratio)` slots and each file an equal share of
    /// the rest; every source runs concurrently and the merged set is cut back to `top_k`.
    pub async fn hybrid_retrieve(&self, query: &HybridQuery) -> Result<RetrievalResponse, DomainError> {
        query.validate()?;

        let base = &query.base;
        let file_ids = self.file_ids_for(query);
        let knowledge_k = self.hybrid.knowledge_share(base.top_k, file_ids.len());
        let file_k = self.hybrid.file_share(base.top_k, file_ids.len());

        let knowledge = async {
            if knowledge_k == 0 {
                return Some(SearchOutcome::default());
            }
            self.search_knowledge(&base.query, &base.filter(), knowledge_k, base.min_score)
                .await
        };
        let files = join_all(
            file_ids
                .iter()
                .map(|file_id| self.files.query(file_id, &base.query, file_k)),
        );

        let (knowledge, files) = tokio::join!(knowledge, files);

        let Some(knowledge) = knowledge else {
            return Ok(RetrievalResponse::embedding_failed());
        };

        let mut results = knowledge.results;
        let mut unavailable = Vec::new();

        for (file_id, FileQueryOutcome { matches, available }) in file_ids.iter().zip(files) {
            if !available {
                unavailable.push(file_id.clone());
            }
            results.extend(
                matches
                    .into_iter()
                    .map(|m| RetrievalResult::from_file_match(file_id, m))
                    .filter(|r| r.score >= base.min_score),
            );
        }

        sort_by_score(&mut results);
        results.truncate(base.top_k);
        assign_ranks(&mut results);

        tracing::debug!(
            results = results.len(),
            files = file_ids.len(),
            unavailable = unavailable.len(),
            fallback = knowledge.fallback,
            "Hybrid retrieval completed"
        );

        Ok(RetrievalResponse::new(results)
            .with_fallback(knowledge.fallback)
            .with_unavailable_files(unavailable))
    }

    /// Distinct file ids, or none when the type filter excludes file chunks
    fn file_ids_for(&self, query: &HybridQuery) -> Vec<String> {
        let types = &query.base.types;
        if !types.is_empty() && !types.contains(&EntryType::FileChunk) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        query
            .file_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    /// `None` when the query could not be embedded
    async fn search_knowledge(
        &self,
        text: &str,
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Option<SearchOutcome> {
        let vector = match self.embedder.embed_text(text).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(
                    provider = self.embedder.provider_name(),
                    error = %e,
                    "Query embedding failed, returning no results"
                );
                return None;
            }
        };

        match self.searcher.search(&vector, filter, top_k, min_score).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(
                    searcher = self.searcher.name(),
                    error = %e,
                    "Knowledge search failed on every tier"
                );
                Some(SearchOutcome::fallback(Vec::new()))
            }
        }
    }
}
