//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Backend that turns text into fixed-dimension vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    fn default_model(&self) -> &'static str;

    /// Native dimensions of a model, if known
    fn dimensions(&self, model: &str) -> Option<usize>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::{Embedding, EmbeddingUsage};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic embedding provider with failure injection
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        error: Option<String>,
        fail_on_call: Option<usize>,
        output_dimensions: Option<usize>,
        drop_last: bool,
        fixed: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                error: None,
                fail_on_call: None,
                output_dimensions: None,
                drop_last: false,
                fixed: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        /// Fail every call
        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Fail only the nth call (1-based)
        pub fn with_failure_on_call(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        /// Answer with vectors of a different size than advertised
        pub fn with_output_dimensions(mut self, dimensions: usize) -> Self {
            self.output_dimensions = Some(dimensions);
            self
        }

        /// Answer with one vector fewer than requested
        pub fn with_missing_vector(mut self) -> Self {
            self.drop_last = true;
            self
        }

        /// Pin the vector returned for an exact text
        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.fixed.insert(text.into(), vector);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn vector_for(&self, text: &str, dimensions: usize) -> Vec<f32> {
            if let Some(vector) = self.fixed.get(text) {
                return vector.clone();
            }

            // FNV-1a keeps distinct texts apart while staying deterministic
            let hash = text
                .bytes()
                .fold(0xcbf29ce484222325u64, |acc, b| (acc ^ b as u64).wrapping_mul(0x100000001b3));

            (0..dimensions)
                .map(|i| {
                    let mixed = hash.rotate_left((i % 64) as u32) ^ (i as u64).wrapping_mul(0x9e3779b97f4a7c15);
                    ((mixed % 2000) as f32 / 1000.0) - 1.0
                })
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            if self.fail_on_call == Some(call) {
                return Err(DomainError::provider(
                    self.name,
                    format!("Mock failure on call {}", call),
                ));
            }

            let dimensions = self.output_dimensions.unwrap_or(self.dimensions);
            let mut embeddings: Vec<Embedding> = request
                .inputs()
                .iter()
                .enumerate()
                .map(|(idx, text)| Embedding::new(idx, self.vector_for(text, dimensions)))
                .collect();

            if self.drop_last {
                embeddings.pop();
            }

            let total_tokens = request.inputs().iter().map(|t| t.len() / 4).sum::<usize>() as u32;

            Ok(EmbeddingResponse::new(
                request.model(),
                embeddings,
                EmbeddingUsage::new(total_tokens, total_tokens),
            ))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn default_model(&self) -> &'static str {
            "mock-embedding"
        }

        fn dimensions(&self, _model: &str) -> Option<usize> {
            Some(self.dimensions)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_batch_input() {
            let provider = MockEmbeddingProvider::new("test", 16);
            let request = EmbeddingRequest::new("mock-embedding", vec!["Hello".into(), "World".into()]);

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 2);
            assert_eq!(response.embeddings()[1].dimensions(), 16);
            assert_ne!(response.embeddings()[0].vector(), response.embeddings()[1].vector());
        }

        #[tokio::test]
        async fn test_mock_provider_fails_on_configured_call() {
            let provider = MockEmbeddingProvider::new("test", 4).with_failure_on_call(2);

            assert!(provider.embed(EmbeddingRequest::single("m", "a")).await.is_ok());
            assert!(provider.embed(EmbeddingRequest::single("m", "b")).await.is_err());
            assert!(provider.embed(EmbeddingRequest::single("m", "c")).await.is_ok());
            assert_eq!(provider.calls(), 3);
        }

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 32);

            let first = provider.embed(EmbeddingRequest::single("m", "Hello")).await.unwrap();
            let second = provider.embed(EmbeddingRequest::single("m", "Hello")).await.unwrap();

            assert_eq!(first.embeddings()[0].vector(), second.embeddings()[0].vector());
        }
    }
}
