//! Ingestion domain - chunking and atomic ingestion units

mod chunker;
mod pipeline;

pub use chunker::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
pub use pipeline::{IngestRequest, IngestionConfig, IngestionResult};

#[cfg(test)]
pub use chunker::mock::MockChunkingStrategy;
