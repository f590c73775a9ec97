//! Knowledge entry entity

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Closed set of knowledge entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    SchemaDescription,
    QuestionAnswer,
    Synonym,
    BusinessDocument,
    FileChunk,
}

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        EntryType::SchemaDescription,
        EntryType::QuestionAnswer,
        EntryType::Synonym,
        EntryType::BusinessDocument,
        EntryType::FileChunk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaDescription => "schema-description",
            Self::QuestionAnswer => "question-answer",
            Self::Synonym => "synonym",
            Self::BusinessDocument => "business-document",
            Self::FileChunk => "file-chunk",
        }
    }

    /// Curated entries are authored knowledge as opposed to raw file content
    pub fn is_curated(&self) -> bool {
        !matches!(self, Self::FileChunk)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");

        EntryType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown entry type '{}'", s)))
    }
}

/// Scope metadata used for filtering and provenance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeMetadata {
    /// Tenant or data-source partition
    #[serde(default, alias = "entity_id", skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Any other caller-defined keys
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ScopeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope_id(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    pub fn with_chunk_index(mut self, chunk_index: usize) -> Self {
        self.chunk_index = Some(chunk_index);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Flatten into a JSON map suitable for a vector record's metadata column
    pub fn to_json_map(&self) -> HashMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }
}

/// A persisted, typed unit of knowledge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub entry_type: EntryType,
    pub title: String,
    pub content: String,
    /// Absent until computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// `None` means shared across owners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub scope: ScopeMetadata,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    /// Create a new entry with a generated id
    pub fn new(entry_type: EntryType, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            entry_type,
            title: title.into(),
            content: content.into(),
            embedding: None,
            owner_id: None,
            parent_id: None,
            scope: ScopeMetadata::default(),
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_owner_opt(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_scope(mut self, scope: ScopeMetadata) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Check the embedding against the configured dimension
    pub fn validate_embedding(&self, dimensions: usize) -> Result<(), DomainError> {
        match &self.embedding {
            Some(vector) if vector.len() != dimensions => {
                Err(DomainError::dimension_mismatch(dimensions, vector.len()))
            }
            _ => Ok(()),
        }
    }

    /// Text handed to the embedding backend
    pub fn embeddable_text(&self) -> String {
        if self.title.is_empty() || self.content.starts_with(&self.title) {
            self.content.clone()
        } else {
            format!("{}\n{}", self.title, self.content)
        }
    }
}
