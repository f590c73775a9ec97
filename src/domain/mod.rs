//! Domain layer - Core types, capability boundaries and validation

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge;
pub mod rerank;
pub mod retrieval;
pub mod vector;

pub use embedding::{Embedder, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{
    Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, IngestRequest, IngestionConfig,
    IngestionResult,
};
pub use knowledge::{
    EntryPayload, EntryType, KnowledgeEntry, KnowledgeRecordStore, RetrievalFilter, ScopeMetadata,
};
pub use rerank::{RerankModel, RerankOptions, RerankWeights};
pub use retrieval::{
    FileChunkMatch, FileRetriever, HybridConfig, HybridQuery, RetrievalQuery, RetrievalResponse,
    RetrievalResult, SearchOutcome, VectorSearcher,
};
pub use vector::{cosine_similarity, VectorRecord, VectorStore};
