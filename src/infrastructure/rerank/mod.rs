//! Reranking backends

mod factory;
mod http_model;
mod reranker;

pub use factory::RerankerFactory;
pub use http_model::{HttpRerankModel, DEFAULT_RERANK_MODEL};
pub use reranker::{RerankOutcome, Reranker};
