//! Embedding backend factory

use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::domain::embedding::{Embedder, EmbeddingProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;

use super::hashing::HashingEmbeddingProvider;
use super::openai::{OpenAiEmbeddingProvider, DEFAULT_OPENAI_BASE_URL};
use super::unavailable::UnavailableEmbeddingProvider;

/// Factory for creating the configured embedder
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create the provider named by the configuration
    pub fn create_provider(
        config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match config.provider {
            EmbeddingBackend::Hashing => {
                Ok(Arc::new(HashingEmbeddingProvider::new(config.dimensions)?))
            }
            EmbeddingBackend::OpenAi => {
                let api_key = config.api_key.as_deref().ok_or_else(|| {
                    DomainError::configuration("OpenAI embedding provider requires an api_key")
                })?;
                let client =
                    HttpClient::with_timeout("openai", Duration::from_secs(config.timeout_secs))?;
                let base_url = config
                    .base_url
                    .as_deref()
                    .unwrap_or(DEFAULT_OPENAI_BASE_URL);

                Ok(Arc::new(OpenAiEmbeddingProvider::with_base_url(
                    client, api_key, base_url,
                )))
            }
        }
    }

    /// Create an embedder, failing on misconfiguration
    pub fn create(config: &EmbeddingConfig) -> Result<Embedder, DomainError> {
        let provider = Self::create_provider(config)?;
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());

        Ok(Embedder::new(provider, model, config.dimensions))
    }

    /// Create an embedder; a backend that cannot start is replaced by one that
    /// fails every call with the original reason
    pub fn create_or_unavailable(config: &EmbeddingConfig) -> Embedder {
        match Self::create(config) {
            Ok(embedder) => embedder,
            Err(e) => {
                tracing::warn!(
                    provider = ?config.provider,
                    error = %e,
                    "Embedding backend failed to initialize; embedding calls will fail"
                );
                Embedder::new(
                    Arc::new(UnavailableEmbeddingProvider::new(e.to_string())),
                    config.model.clone().unwrap_or_default(),
                    config.dimensions,
                )
            }
        }
    }
}
