//! Chunking and ingestion

mod chunker;
mod pipeline;

pub use chunker::RecursiveCharacterChunker;
pub use pipeline::IngestionPipeline;
