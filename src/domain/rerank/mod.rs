//! Reranking domain

mod config;
mod model;

pub use config::{
    normalize_relevance, recency_score, type_priority, RerankOptions, RerankWeights,
    DEFAULT_RECENCY_HALF_LIFE_DAYS,
};
pub use model::RerankModel;

#[cfg(test)]
pub use model::mock::MockRerankModel;
