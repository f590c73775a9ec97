//! Wiring of searchers and file retrievers from configuration

use std::sync::Arc;
use std::time::Duration;

use crate::config::{FileRetrievalConfig, RetrievalSettings};
use crate::domain::knowledge::KnowledgeRecordStore;
use crate::domain::retrieval::{FileRetriever, VectorSearcher};
use crate::domain::vector::VectorStore;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;

use super::fallback::FallbackSearcher;
use super::files::{DisabledFileRetriever, HttpFileRetriever};
use super::indexed::IndexedSearcher;
use super::scan::ScanSearcher;

#[derive(Debug)]
pub struct RetrievalFactory;

impl RetrievalFactory {
    /// Indexed vector search with the brute-force record scan behind it
    pub fn create_searcher(
        settings: &RetrievalSettings,
        vectors: Arc<dyn VectorStore>,
        records: Arc<dyn KnowledgeRecordStore>,
    ) -> Arc<dyn VectorSearcher> {
        let indexed = IndexedSearcher::new(vectors)
            .with_candidate_multiplier(settings.candidate_multiplier);

        Arc::new(FallbackSearcher::new(
            Arc::new(indexed),
            Arc::new(ScanSearcher::new(records)),
        ))
    }

    /// HTTP file store when `base_url` is set, otherwise a retriever that returns nothing
    pub fn create_file_retriever(
        config: &FileRetrievalConfig,
    ) -> Result<Arc<dyn FileRetriever>, DomainError> {
        let Some(ref base_url) = config.base_url else {
            return Ok(Arc::new(DisabledFileRetriever));
        };

        let client = HttpClient::with_timeout("file_store", Duration::from_secs(config.timeout_secs))?;
        let mut retriever = HttpFileRetriever::new(client, base_url);
        if let Some(ref key) = config.api_key {
            retriever = retriever.with_api_key(key);
        }

        Ok(Arc::new(retriever))
    }
}
