//! Retrieval query types

use serde::{Deserialize, Serialize};

use crate::domain::knowledge::{EntryType, RetrievalFilter};
use crate::domain::DomainError;

pub const DEFAULT_TOP_K: usize = 10;
pub const MAX_TOP_K: usize = 100;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Single-source semantic query against the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub query: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub types: Vec<EntryType>,
    #[serde(default, alias = "entity_id")]
    pub scope_id: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub min_score: f32,
}

impl RetrievalQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            owner_id: None,
            types: Vec::new(),
            scope_id: None,
            top_k: DEFAULT_TOP_K,
            min_score: 0.0,
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_types(mut self, types: Vec<EntryType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_scope(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn filter(&self) -> RetrievalFilter {
        RetrievalFilter {
            owner_id: self.owner_id.clone(),
            scope_id: self.scope_id.clone(),
            types: self.types.clone(),
            source_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.query.trim().is_empty() {
            return Err(DomainError::validation("query cannot be empty"));
        }

        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(DomainError::validation(format!(
                "top_k must be between 1 and {}, got {}",
                MAX_TOP_K, self.top_k
            )));
        }

        if !self.min_score.is_finite() || !(-1.0..=1.0).contains(&self.min_score) {
            return Err(DomainError::validation(format!(
                "min_score must be within [-1, 1], got {}",
                self.min_score
            )));
        }

        Ok(())
    }
}

/// Knowledge base query fused with zero or more external files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridQuery {
    #[serde(flatten)]
    pub base: RetrievalQuery,
    #[serde(default)]
    pub file_ids: Vec<String>,
}

impl HybridQuery {
    pub fn new(base: RetrievalQuery) -> Self {
        Self {
            base,
            file_ids: Vec::new(),
        }
    }

    pub fn with_file_ids(mut self, file_ids: Vec<String>) -> Self {
        self.file_ids = file_ids;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.base.validate()?;

        if self.file_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(DomainError::validation("file ids cannot be empty"));
        }

        Ok(())
    }
}
