//! Knowledge Retrieval
//!
//! Ingests documents and curated knowledge entries into a vector index and
//! answers hybrid, reranked similarity queries over them.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    embedding::EmbeddingProviderFactory,
    ingestion::{IngestionPipeline, RecursiveCharacterChunker},
    knowledge::create_record_store,
    rerank::RerankerFactory,
    retrieval::{RetrievalFactory, RetrievalService},
    services::KnowledgeService,
    vector_store::{PgPoolRegistry, VectorStoreFactory},
};
use tracing::info;

/// Wire stores, embedder, retrieval and reranking from configuration
pub async fn build_knowledge_service(config: &AppConfig) -> anyhow::Result<KnowledgeService> {
    config.validate()?;

    let embedder = EmbeddingProviderFactory::create_or_unavailable(&config.embedding);
    info!(
        provider = embedder.provider_name(),
        model = embedder.model(),
        dimensions = embedder.dimensions(),
        "Embedding backend ready"
    );

    let pools = PgPoolRegistry::new(config.vector_store.max_connections);
    let vectors =
        VectorStoreFactory::create(&config.vector_store, embedder.dimensions(), &pools).await?;
    let records =
        create_record_store(&config.knowledge_store, &config.vector_store, &pools).await?;
    info!(
        vector_store = ?config.vector_store.backend,
        knowledge_store = ?config.knowledge_store.backend,
        "Stores ready"
    );

    let pipeline = IngestionPipeline::new(
        Arc::new(RecursiveCharacterChunker::new()),
        embedder.clone(),
        vectors.clone(),
        config.ingestion.to_ingestion_config(),
    )?;

    let searcher = RetrievalFactory::create_searcher(&config.retrieval, vectors.clone(), records.clone());
    let retrieval = RetrievalService::new(embedder.clone(), searcher)
        .with_hybrid_config(config.retrieval.hybrid_config())?
        .with_file_retriever(RetrievalFactory::create_file_retriever(&config.file_retrieval)?);

    let reranker = RerankerFactory::create(&config.rerank)?;
    info!(enabled = reranker.is_enabled(), "Reranker ready");

    Ok(KnowledgeService::new(embedder, records, vectors, pipeline, retrieval).with_reranker(reranker))
}

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let service = build_knowledge_service(config).await?;

    Ok(AppState::new(Arc::new(service)).with_retrieval_defaults(config.retrieval.clone()))
}
