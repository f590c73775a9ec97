//! Rerank model speaking the Cohere/Jina `/v1/rerank` wire format

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::rerank::RerankModel;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_RERANK_MODEL: &str = "rerank-english-v3.0";

#[derive(Debug)]
pub struct HttpRerankModel<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
    auth_header: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankHit>,
}

#[derive(Debug, Deserialize)]
struct RerankHit {
    index: usize,
    relevance_score: f32,
}

impl<C: HttpClientTrait> HttpRerankModel<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_RERANK_MODEL.to_string(),
            auth_header: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    fn rerank_url(&self) -> String {
        format!("{}/v1/rerank", self.base_url)
    }

    /// Results come back sorted by relevance; put them back in input order
    fn parse_response(&self, json: serde_json::Value, expected: usize) -> Result<Vec<f32>, DomainError> {
        let response: RerankResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("rerank", format!("Failed to parse rerank response: {}", e))
        })?;

        let mut scores = vec![None; expected];
        for hit in response.results {
            let slot = scores.get_mut(hit.index).ok_or_else(|| {
                DomainError::provider(
                    "rerank",
                    format!("Rerank result index {} out of range for {} documents", hit.index, expected),
                )
            })?;
            *slot = Some(hit.relevance_score);
        }

        scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.ok_or_else(|| {
                    DomainError::provider("rerank", format!("Rerank response missing document {}", i))
                })
            })
            .collect()
    }
}

#[async_trait]
impl<C: HttpClientTrait> RerankModel for HttpRerankModel<C> {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        let body = serde_json::json!({
            "model": self.model,
            "query": query,
            "documents": texts,
            "top_n": texts.len(),
        });

        let json = self.client.post_json(&self.rerank_url(), headers, &body).await?;
        self.parse_response(json, texts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use crate::infrastructure::http_client::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scores_returned_in_input_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .and(header("Authorization", "Bearer key"))
            .and(body_partial_json(serde_json::json!({
                "model": "rerank-v1",
                "query": "monthly revenue",
                "top_n": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "index": 2, "relevance_score": 0.91 },
                    { "index": 0, "relevance_score": 0.40 },
                    { "index": 1, "relevance_score": 0.05 }
                ]
            })))
            .mount(&server)
            .await;

        let model = HttpRerankModel::new(HttpClient::new("rerank"), server.uri())
            .with_model("rerank-v1")
            .with_api_key("key");

        let scores = model
            .score("monthly revenue", &texts(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(scores, vec![0.40, 0.05, 0.91]);
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/rerank"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let model = HttpRerankModel::new(HttpClient::new("rerank"), server.uri());

        let result = model.score("q", &texts(&["a"])).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_missing_document_score_is_error() {
        let client = MockHttpClient::new().with_response(
            "http://rerank/v1/rerank",
            serde_json::json!({ "results": [{ "index": 0, "relevance_score": 0.5 }] }),
        );
        let model = HttpRerankModel::new(client, "http://rerank");

        let result = model.score("q", &texts(&["a", "b"])).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_error() {
        let client = MockHttpClient::new().with_response(
            "http://rerank/v1/rerank",
            serde_json::json!({ "results": [{ "index": 7, "relevance_score": 0.5 }] }),
        );
        let model = HttpRerankModel::new(client, "http://rerank");

        assert!(model.score("q", &texts(&["a"])).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_input_skips_request() {
        let client = MockHttpClient::new();
        let model = HttpRerankModel::new(client, "http://rerank");

        let scores = model.score("q", &[]).await.unwrap();

        assert!(scores.is_empty());
        assert!(model.client.requests().is_empty());
    }
}
