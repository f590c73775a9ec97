//! Vector record - the embedding-bearing row of the vector store

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::knowledge::{EntryType, RetrievalFilter};

/// A stored embedding bound to its ingestion unit and scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    /// Groups every record produced by one ingestion unit
    pub source_id: String,
    pub owner_id: Option<String>,
    pub scope_id: Option<String>,
    pub entry_type: EntryType,
    pub title: String,
    pub chunk_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl VectorRecord {
    pub fn new(
        source_id: impl Into<String>,
        chunk_index: usize,
        content: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.into(),
            owner_id: None,
            scope_id: None,
            entry_type: EntryType::FileChunk,
            title: String::new(),
            chunk_index,
            content: content.into(),
            embedding,
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_owner(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn with_scope_id(mut self, scope_id: Option<String>) -> Self {
        self.scope_id = scope_id;
        self
    }

    pub fn with_entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = entry_type;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    pub fn matches(&self, filter: &RetrievalFilter) -> bool {
        filter.matches_owner(self.owner_id.as_deref())
            && filter.matches_scope(self.scope_id.as_deref())
            && filter.matches_type(self.entry_type)
            && filter.matches_source(Some(self.source_id.as_str()))
    }
}
