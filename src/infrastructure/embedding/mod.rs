//! Embedding provider implementations

mod factory;
mod hashing;
mod openai;
mod unavailable;

pub use factory::EmbeddingProviderFactory;
pub use hashing::{HashingEmbeddingProvider, DEFAULT_HASHING_DIMENSIONS, HASHING_MODEL};
pub use openai::{OpenAiEmbeddingProvider, DEFAULT_OPENAI_BASE_URL};
pub use unavailable::UnavailableEmbeddingProvider;
