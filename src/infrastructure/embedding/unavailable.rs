//! Placeholder for a backend that failed to initialize

use async_trait::async_trait;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Reports its initialization failure on every call
///
/// Lets the service start (retrieval degrades to empty answers) while ingestion surfaces
/// the failure as a fatal error instead of silently skipping documents.
#[derive(Debug, Clone)]
pub struct UnavailableEmbeddingProvider {
    reason: String,
}

impl UnavailableEmbeddingProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl EmbeddingProvider for UnavailableEmbeddingProvider {
    async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        Err(DomainError::embedding(format!(
            "Embedding backend unavailable: {}",
            self.reason
        )))
    }

    fn provider_name(&self) -> &'static str {
        "unavailable"
    }

    fn default_model(&self) -> &'static str {
        "none"
    }

    fn dimensions(&self, _model: &str) -> Option<usize> {
        None
    }
}
