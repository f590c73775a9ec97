//! Ingestion configuration, requests and results

use serde::{Deserialize, Serialize};

use super::chunker::ChunkingConfig;
use crate::domain::knowledge::{validate_source_id, EntryType, ScopeMetadata};
use crate::domain::vector::VectorRecord;
use crate::domain::DomainError;

/// Configuration for the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(flatten)]
    pub chunking: ChunkingConfig,
    /// Chunks embedded per backend call; must be at least 1
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    64
}

impl IngestionConfig {
    pub fn new(chunking: ChunkingConfig, batch_size: usize) -> Self {
        Self {
            chunking,
            batch_size,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking.validate()?;

        if self.batch_size == 0 {
            return Err(DomainError::validation("batch_size must be at least 1"));
        }

        Ok(())
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            batch_size: default_batch_size(),
        }
    }
}

/// One ingestion unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub source_id: String,
    pub text: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub scope: ScopeMetadata,
    #[serde(default = "default_entry_type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub title: Option<String>,
}

fn default_entry_type() -> EntryType {
    EntryType::FileChunk
}

impl IngestRequest {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            owner_id: None,
            scope: ScopeMetadata::default(),
            entry_type: default_entry_type(),
            title: None,
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_owner_opt(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn with_scope(mut self, scope: ScopeMetadata) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = entry_type;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_source_id(&self.source_id)?;
        Ok(())
    }
}

/// Outcome of a committed ingestion unit
#[derive(Debug, Clone)]
pub struct IngestionResult {
    pub source_id: String,
    pub records_created: usize,
    pub batches: usize,
    /// Records as written, embeddings included
    pub records: Vec<VectorRecord>,
}

impl IngestionResult {
    pub fn record_count(&self) -> usize {
        self.records_created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let config = IngestionConfig::new(ChunkingConfig::default(), 0);
        assert!(matches!(config.validate(), Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.chunking.chunk_size, 1000);
    }

    #[test]
    fn test_request_defaults_to_file_chunks() {
        let request = IngestRequest::new("file-1", "text");
        assert_eq!(request.entry_type, EntryType::FileChunk);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_invalid_source_id() {
        let request = IngestRequest::new("", "text");
        assert!(matches!(request.validate(), Err(DomainError::InvalidId { .. })));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: IngestRequest = serde_json::from_value(serde_json::json!({
            "source_id": "f1",
            "text": "hello",
            "scope": {"entity_id": "ds-1"}
        }))
        .unwrap();

        assert_eq!(request.scope.scope_id.as_deref(), Some("ds-1"));
        assert_eq!(request.entry_type, EntryType::FileChunk);
    }
}
