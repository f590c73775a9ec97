//! File-retrieval collaborator boundary

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A chunk returned by an external file store, scored by distance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChunkMatch {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub distance: f32,
}

impl FileChunkMatch {
    pub fn new(content: impl Into<String>, distance: f32) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
            distance,
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn similarity(&self) -> f32 {
        if !self.distance.is_finite() {
            return 0.0;
        }
        (1.0 - self.distance).clamp(0.0, 1.0)
    }
}

/// Queries chunks of an uploaded file held outside the knowledge base
#[async_trait]
pub trait FileRetriever: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn query_file(
        &self,
        file_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<FileChunkMatch>, DomainError>;
}
