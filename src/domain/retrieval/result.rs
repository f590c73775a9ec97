//! Retrieval results

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file_retriever::FileChunkMatch;
use crate::domain::knowledge::{EntryType, KnowledgeEntry};
use crate::domain::vector::VectorRecord;

/// One scored candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub id: String,
    pub source_id: String,
    pub entry_type: EntryType,
    pub title: String,
    pub content: String,
    /// Similarity in [0, 1] (or a monotonic proxy)
    pub score: f32,
    /// 1-based, assigned after reranking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    /// Set when the candidate came from the file-retrieval collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RetrievalResult {
    pub fn from_record(record: &VectorRecord, score: f32) -> Self {
        Self {
            id: record.id.clone(),
            source_id: record.source_id.clone(),
            entry_type: record.entry_type,
            title: record.title.clone(),
            content: record.content.clone(),
            score,
            rank: None,
            rerank_score: None,
            owner_id: record.owner_id.clone(),
            scope_id: record.scope_id.clone(),
            file_id: None,
            chunk_index: Some(record.chunk_index),
            metadata: record.metadata.clone(),
            created_at: Some(record.created_at),
        }
    }

    pub fn from_entry(entry: &KnowledgeEntry, score: f32) -> Self {
        Self {
            id: entry.id.clone(),
            source_id: entry.scope.source_id.clone().unwrap_or_else(|| entry.id.clone()),
            entry_type: entry.entry_type,
            title: entry.title.clone(),
            content: entry.content.clone(),
            score,
            rank: None,
            rerank_score: None,
            owner_id: entry.owner_id.clone(),
            scope_id: entry.scope.scope_id.clone(),
            file_id: entry.scope.file_id.clone(),
            chunk_index: entry.scope.chunk_index,
            metadata: entry.metadata.clone(),
            created_at: Some(entry.updated_at),
        }
    }

    /// Convert a file-store hit; similarity is `1 - distance` clamped to [0, 1]
    pub fn from_file_match(file_id: &str, matched: FileChunkMatch) -> Self {
        let chunk_index = matched
            .metadata
            .get("chunk_index")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize);
        let id = matched
            .metadata
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}:{}", file_id, chunk_index.unwrap_or_default()));
        let title = matched
            .metadata
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(file_id)
            .to_string();

        Self {
            id,
            source_id: file_id.to_string(),
            entry_type: EntryType::FileChunk,
            title,
            score: matched.similarity(),
            content: matched.content,
            rank: None,
            rerank_score: None,
            owner_id: None,
            scope_id: None,
            file_id: Some(file_id.to_string()),
            chunk_index,
            metadata: matched.metadata,
            created_at: None,
        }
    }
}

/// Sort descending by score; ties keep their incoming order
pub fn sort_by_score(results: &mut [RetrievalResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Assign contiguous 1-based ranks in current order
pub fn assign_ranks(results: &mut [RetrievalResult]) {
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = Some(i + 1);
    }
}

/// Results plus the degradation flags callers use to tell best-effort answers apart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalResponse {
    pub results: Vec<RetrievalResult>,
    pub total: usize,
    /// Indexed search failed and the brute-force scan answered
    pub fallback: bool,
    pub reranked: bool,
    /// Query embedding failed; results are empty
    pub embedding_failed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_files: Vec<String>,
}

impl RetrievalResponse {
    pub fn new(results: Vec<RetrievalResult>) -> Self {
        Self {
            total: results.len(),
            results,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn embedding_failed() -> Self {
        Self {
            embedding_failed: true,
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_unavailable_files(mut self, files: Vec<String>) -> Self {
        self.unavailable_files = files;
        self
    }

    /// Replace results, keeping `total` in sync
    pub fn with_results(mut self, results: Vec<RetrievalResult>) -> Self {
        self.total = results.len();
        self.results = results;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
