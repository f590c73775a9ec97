//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingBackend, EmbeddingConfig, FileRetrievalConfig, IngestionSettings,
    KnowledgeStoreBackend, KnowledgeStoreConfig, LogFormat, LoggingConfig, RerankSettings,
    RetrievalSettings, ServerConfig, VectorStoreBackend, VectorStoreConfig,
};
