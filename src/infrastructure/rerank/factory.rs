//! Reranker factory

use std::sync::Arc;
use std::time::Duration;

use crate::config::RerankSettings;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;

use super::http_model::HttpRerankModel;
use super::reranker::Reranker;

#[derive(Debug)]
pub struct RerankerFactory;

impl RerankerFactory {
    /// A disabled section or a missing `base_url` yields the score-sort reranker
    pub fn create(settings: &RerankSettings) -> Result<Reranker, DomainError> {
        let reranker = match (settings.enabled, settings.base_url.as_deref()) {
            (true, Some(base_url)) => {
                let client =
                    HttpClient::with_timeout("rerank", Duration::from_secs(settings.timeout_secs))?;
                let mut model = HttpRerankModel::new(client, base_url).with_model(&settings.model);
                if let Some(ref key) = settings.api_key {
                    model = model.with_api_key(key);
                }
                Reranker::new(Arc::new(model))
            }
            (true, None) => {
                tracing::warn!("Reranking enabled without base_url, using score sort");
                Reranker::disabled()
            }
            (false, _) => Reranker::disabled(),
        };

        Ok(reranker
            .with_weights(settings.weights)?
            .with_half_life_days(settings.recency_half_life_days))
    }
}
