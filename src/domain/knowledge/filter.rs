//! Scalar filters shared by the vector store and the record store

use serde::{Deserialize, Serialize};

use super::entry::{EntryType, KnowledgeEntry};

/// Filter applied to every similarity search and fallback scan
///
/// An owner filter also matches shared entries (those without an owner).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<EntryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl RetrievalFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_scope(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    pub fn with_types(mut self, types: Vec<EntryType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn matches_owner(&self, owner_id: Option<&str>) -> bool {
        match (&self.owner_id, owner_id) {
            (None, _) | (Some(_), None) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
        }
    }

    pub fn matches_scope(&self, scope_id: Option<&str>) -> bool {
        match &self.scope_id {
            None => true,
            Some(wanted) => scope_id == Some(wanted.as_str()),
        }
    }

    pub fn matches_type(&self, entry_type: EntryType) -> bool {
        self.types.is_empty() || self.types.contains(&entry_type)
    }

    pub fn matches_source(&self, source_id: Option<&str>) -> bool {
        match &self.source_id {
            None => true,
            Some(wanted) => source_id == Some(wanted.as_str()),
        }
    }

    /// Evaluate the filter against a knowledge entry
    pub fn matches_entry(&self, entry: &KnowledgeEntry) -> bool {
        self.matches_owner(entry.owner_id.as_deref())
            && self.matches_scope(entry.scope.scope_id.as_deref())
            && self.matches_type(entry.entry_type)
            && self.matches_source(entry.scope.source_id.as_deref())
    }
}
