//! File-retrieval collaborators

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::retrieval::{FileChunkMatch, FileRetriever};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Queries an external file store over HTTP
///
/// `POST {base_url}/files/{file_id}/query` with `{"query", "k"}` returns
/// `{"matches": [{"content", "metadata", "distance"}]}`.
#[derive(Debug)]
pub struct HttpFileRetriever<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileQueryResponse {
    #[serde(default)]
    matches: Vec<FileChunkMatch>,
}

impl<C: HttpClientTrait> HttpFileRetriever<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    /// File ids are pushed as single path segments, so `/`, `?` and `#` are escaped
    fn query_url(&self, file_id: &str) -> Result<String, DomainError> {
        let invalid = |reason: String| {
            DomainError::configuration(format!("Invalid file store URL '{}': {}", self.base_url, reason))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("files")
            .push(file_id)
            .push("query");

        Ok(url.into())
    }
}

#[async_trait]
impl<C: HttpClientTrait> FileRetriever for HttpFileRetriever<C> {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn query_file(
        &self,
        file_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<FileChunkMatch>, DomainError> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        let url = self.query_url(file_id)?;
        let body = serde_json::json!({ "query": query, "k": k });
        let json = self.client.post_json(&url, headers, &body).await?;

        let response: FileQueryResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("file_store", format!("Failed to parse file query response: {}", e))
        })?;

        Ok(response.matches)
    }
}

/// Used when no file store is configured; every file yields nothing
#[derive(Debug, Default, Clone)]
pub struct DisabledFileRetriever;

#[async_trait]
impl FileRetriever for DisabledFileRetriever {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn query_file(
        &self,
        _file_id: &str,
        _query: &str,
        _k: usize,
    ) -> Result<Vec<FileChunkMatch>, DomainError> {
        Ok(Vec::new())
    }
}

/// Result of querying one file, with failures folded into `available`
#[derive(Debug, Clone, Default)]
pub struct FileQueryOutcome {
    pub matches: Vec<FileChunkMatch>,
    pub available: bool,
}

/// Wraps a file retriever so one broken file never fails the whole query
#[derive(Debug, Clone)]
pub struct ResilientFileRetriever {
    inner: Arc<dyn FileRetriever>,
}

impl ResilientFileRetriever {
    pub fn new(inner: Arc<dyn FileRetriever>) -> Self {
        Self { inner }
    }

    pub async fn query(&self, file_id: &str, query: &str, k: usize) -> FileQueryOutcome {
        match self.inner.query_file(file_id, query, k).await {
            Ok(matches) => FileQueryOutcome {
                matches,
                available: true,
            },
            Err(e) => {
                tracing::warn!(
                    file_id = %file_id,
                    retriever = self.inner.name(),
                    error = %e,
                    "File query failed, skipping file"
                );
                FileQueryOutcome::default()
            }
        }
    }
}

#[async_trait]
impl FileRetriever for ResilientFileRetriever {
    fn name(&self) -> &'static str {
        "resilient"
    }

    async fn query_file(
        &self,
        file_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<FileChunkMatch>, DomainError> {
        Ok(self.query(file_id, query, k).await.matches)
    }
}
