//! Embedder - validated access to an embedding provider

use std::sync::Arc;

use super::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::DomainError;

/// Binds a provider to one model and one expected dimension
///
/// Every call checks that the backend returned one vector per input and that each vector
/// has the configured dimension.
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    dimensions: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimensions,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;

        vectors
            .pop()
            .ok_or_else(|| DomainError::embedding("Embedding backend returned no vector"))
    }

    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest::new(&self.model, texts.to_vec());
        let response = self.provider.embed(request).await?;
        let vectors = response.into_ordered_vectors();

        if vectors.len() != texts.len() {
            return Err(DomainError::embedding(format!(
                "Embedding backend returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(DomainError::dimension_mismatch(self.dimensions, bad.len()));
        }

        tracing::debug!(
            provider = self.provider.provider_name(),
            model = %self.model,
            count = vectors.len(),
            "Embedded batch"
        );

        Ok(vectors)
    }
}
