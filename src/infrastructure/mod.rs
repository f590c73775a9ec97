//! Infrastructure layer - concrete backends and orchestration

pub mod embedding;
pub mod http_client;
pub mod ingestion;
pub mod knowledge;
pub mod logging;
pub mod rerank;
pub mod retrieval;
pub mod services;
pub mod vector_store;
