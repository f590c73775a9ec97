//! Base and enhanced reranking with score-sort fallback

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::rerank::{
    normalize_relevance, recency_score, type_priority, RerankModel, RerankOptions, RerankWeights,
    DEFAULT_RECENCY_HALF_LIFE_DAYS,
};
use crate::domain::retrieval::{assign_ranks, sort_by_score, RetrievalResult};
use crate::domain::DomainError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Reranked results; `reranked` is false when the plain score sort answered
#[derive(Debug, Clone, Default)]
pub struct RerankOutcome {
    pub results: Vec<RetrievalResult>,
    pub reranked: bool,
}

/// Reorders candidates with an optional scoring model
///
/// Never fails: a missing or broken model degrades to sorting by similarity.
#[derive(Debug, Clone)]
pub struct Reranker {
    model: Option<Arc<dyn RerankModel>>,
    weights: RerankWeights,
    half_life_days: f64,
}

impl Default for Reranker {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Reranker {
    pub fn new(model: Arc<dyn RerankModel>) -> Self {
        Self {
            model: Some(model),
            weights: RerankWeights::default(),
            half_life_days: DEFAULT_RECENCY_HALF_LIFE_DAYS,
        }
    }

    /// Reranker without a model; always takes the score-sort path
    pub fn disabled() -> Self {
        Self {
            model: None,
            weights: RerankWeights::default(),
            half_life_days: DEFAULT_RECENCY_HALF_LIFE_DAYS,
        }
    }

    pub fn with_weights(mut self, weights: RerankWeights) -> Result<Self, DomainError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn with_half_life_days(mut self, days: f64) -> Self {
        self.half_life_days = days;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn rerank(
        &self,
        query: &str,
        candidates: Vec<RetrievalResult>,
        top_k: usize,
        options: &RerankOptions,
    ) -> RerankOutcome {
        self.rerank_at(query, candidates, top_k, options, Utc::now())
            .await
    }

    /// Same as [`Reranker::rerank`] with recency measured from `now`
    pub async fn rerank_at(
        &self,
        query: &str,
        mut candidates: Vec<RetrievalResult>,
        top_k: usize,
        options: &RerankOptions,
        now: DateTime<Utc>,
    ) -> RerankOutcome {
        let scores = match self.model_scores(query, &candidates).await {
            Some(scores) => scores,
            None => return Self::score_sort(candidates, top_k),
        };

        if options.enhanced {
            let weights = match options.weights {
                Some(w) if w.validate().is_ok() => w,
                Some(w) => {
                    tracing::warn!(weights = ?w, "Ignoring invalid rerank weights");
                    self.weights
                }
                None => self.weights,
            };

            for (candidate, base) in candidates.iter_mut().zip(scores) {
                let age_days = candidate
                    .created_at
                    .map(|t| (now - t).num_seconds() as f64 / SECONDS_PER_DAY);
                candidate.rerank_score = Some(weights.composite(
                    normalize_relevance(base),
                    type_priority(candidate.entry_type),
                    recency_score(age_days, self.half_life_days),
                ));
            }
        } else {
            for (candidate, base) in candidates.iter_mut().zip(scores) {
                candidate.rerank_score = Some(if base.is_nan() { 0.0 } else { base });
            }
        }

        candidates.sort_by(|a, b| {
            let a = a.rerank_score.unwrap_or(a.score);
            let b = b.rerank_score.unwrap_or(b.score);
            b.total_cmp(&a)
        });
        candidates.truncate(top_k);
        assign_ranks(&mut candidates);

        RerankOutcome {
            results: candidates,
            reranked: true,
        }
    }

    /// `None` when there is no usable model answer
    async fn model_scores(&self, query: &str, candidates: &[RetrievalResult]) -> Option<Vec<f32>> {
        let model = self.model.as_ref()?;
        if candidates.is_empty() {
            return None;
        }

        let texts: Vec<String> = candidates.iter().map(|c| c.content.clone()).collect();

        match model.score(query, &texts).await {
            Ok(scores) if scores.len() == texts.len() => Some(scores),
            Ok(scores) => {
                tracing::warn!(
                    model = model.name(),
                    expected = texts.len(),
                    actual = scores.len(),
                    "Rerank model returned wrong number of scores, falling back to score sort"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    model = model.name(),
                    error = %e,
                    "Rerank model unavailable, falling back to score sort"
                );
                None
            }
        }
    }

    fn score_sort(mut candidates: Vec<RetrievalResult>, top_k: usize) -> RerankOutcome {
        sort_by_score(&mut candidates);
        candidates.truncate(top_k);
        assign_ranks(&mut candidates);

        RerankOutcome {
            results: candidates,
            reranked: false,
        }
    }
}
