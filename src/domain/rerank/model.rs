//! Reranking model boundary

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Scores candidate texts against a query
///
/// Must return exactly one score per text, in input order.
#[async_trait]
pub trait RerankModel: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores texts from a lookup table; unknown texts score 0.0
    #[derive(Debug, Default)]
    pub struct MockRerankModel {
        scores: HashMap<String, f32>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockRerankModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_score(mut self, text: impl Into<String>, score: f32) -> Self {
            self.scores.insert(text.into(), score);
            self
        }

        pub fn failing(error: impl Into<String>) -> Self {
            Self {
                error: Some(error.into()),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RerankModel for MockRerankModel {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn score(&self, _query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock-rerank", error));
            }

            Ok(texts
                .iter()
                .map(|t| self.scores.get(t).copied().unwrap_or(0.0))
                .collect())
        }
    }
}
