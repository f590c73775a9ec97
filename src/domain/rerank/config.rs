//! Reranking weights, options and scoring components

use serde::{Deserialize, Serialize};

use crate::domain::knowledge::EntryType;
use crate::domain::DomainError;

pub const DEFAULT_RECENCY_HALF_LIFE_DAYS: f64 = 30.0;

/// Weights of the enhanced composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerankWeights {
    pub similarity: f32,
    pub type_priority: f32,
    pub recency: f32,
}

impl Default for RerankWeights {
    fn default() -> Self {
        Self {
            similarity: 0.7,
            type_priority: 0.2,
            recency: 0.1,
        }
    }
}

impl RerankWeights {
    pub fn new(similarity: f32, type_priority: f32, recency: f32) -> Self {
        Self {
            similarity,
            type_priority,
            recency,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let all = [self.similarity, self.type_priority, self.recency];

        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DomainError::validation(format!(
                "rerank weights must be finite and non-negative, got {:?}",
                self
            )));
        }

        Ok(())
    }

    pub fn composite(&self, similarity: f32, type_priority: f32, recency: f32) -> f32 {
        similarity * self.similarity + type_priority * self.type_priority + recency * self.recency
    }
}

/// Per-call reranking options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RerankOptions {
    #[serde(default)]
    pub enhanced: bool,
    #[serde(default)]
    pub weights: Option<RerankWeights>,
    /// Overrides the query's `top_k` when set; retrieval is widened to match
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl RerankOptions {
    pub fn base() -> Self {
        Self::default()
    }

    pub fn enhanced() -> Self {
        Self {
            enhanced: true,
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: RerankWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// Constant preference of curated knowledge over raw file content
pub fn type_priority(entry_type: EntryType) -> f32 {
    match entry_type {
        EntryType::SchemaDescription => 1.0,
        EntryType::QuestionAnswer => 1.0,
        EntryType::Synonym => 0.8,
        EntryType::BusinessDocument => 0.6,
        EntryType::FileChunk => 0.4,
    }
}

/// Exponential decay `0.5^(age / half_life)`; future ages score 1.0, unknown ages 0.5
pub fn recency_score(age_days: Option<f64>, half_life_days: f64) -> f32 {
    match age_days {
        Some(age) if age > 0.0 && half_life_days > 0.0 => 0.5f64.powf(age / half_life_days) as f32,
        Some(_) => 1.0,
        None => 0.5,
    }
}

/// Map an unbounded model score into [0, 1]; scores already in range pass through
pub fn normalize_relevance(score: f32) -> f32 {
    if (0.0..=1.0).contains(&score) {
        score
    } else if score.is_nan() {
        0.0
    } else {
        1.0 / (1.0 + (-score).exp())
    }
}
