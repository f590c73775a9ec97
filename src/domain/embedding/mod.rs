//! Embedding backend boundary

mod embedder;
mod provider;
mod request;
mod response;

pub use embedder::Embedder;
pub use provider::EmbeddingProvider;
pub use request::EmbeddingRequest;
pub use response::{Embedding, EmbeddingResponse, EmbeddingUsage};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
