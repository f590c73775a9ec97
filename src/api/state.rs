//! Application state shared by handlers

use std::sync::Arc;

use crate::config::RetrievalSettings;
use crate::infrastructure::services::KnowledgeService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub knowledge: Arc<KnowledgeService>,
    /// Applied when a request omits `top_k` / `min_score`
    pub retrieval_defaults: RetrievalSettings,
}

impl AppState {
    pub fn new(knowledge: Arc<KnowledgeService>) -> Self {
        Self {
            knowledge,
            retrieval_defaults: RetrievalSettings::default(),
        }
    }

    pub fn with_retrieval_defaults(mut self, defaults: RetrievalSettings) -> Self {
        self.retrieval_defaults = defaults;
        self
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::Embedder;
    use crate::domain::ingestion::{ChunkingConfig, IngestionConfig};
    use crate::domain::vector::VectorStore;
    use crate::infrastructure::embedding::HashingEmbeddingProvider;
    use crate::infrastructure::ingestion::{IngestionPipeline, RecursiveCharacterChunker};
    use crate::infrastructure::knowledge::InMemoryKnowledgeRecordStore;
    use crate::infrastructure::retrieval::{RetrievalFactory, RetrievalService};
    use crate::infrastructure::vector_store::InMemoryVectorStore;

    /// State backed entirely by in-memory stores and the hashing embedder
    pub fn in_memory_state() -> AppState {
        let embedder = Embedder::new(
            Arc::new(HashingEmbeddingProvider::new(64).unwrap()),
            "feature-hash-v1",
            64,
        );
        let vectors: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
        let records = Arc::new(InMemoryKnowledgeRecordStore::new());
        let pipeline = IngestionPipeline::new(
            Arc::new(RecursiveCharacterChunker::new()),
            embedder.clone(),
            vectors.clone(),
            IngestionConfig::new(ChunkingConfig::new(60, 10), 4),
        )
        .unwrap();
        let settings = RetrievalSettings::default();
        let searcher = RetrievalFactory::create_searcher(&settings, vectors.clone(), records.clone());
        let retrieval = RetrievalService::new(embedder.clone(), searcher);

        AppState::new(Arc::new(KnowledgeService::new(
            embedder, records, vectors, pipeline, retrieval,
        )))
    }
}
