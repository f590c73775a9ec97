use serde::Deserialize;

use crate::domain::ingestion::{ChunkingConfig, IngestionConfig};
use crate::domain::rerank::{RerankWeights, DEFAULT_RECENCY_HALF_LIFE_DAYS};
use crate::domain::retrieval::{
    HybridConfig, DEFAULT_CANDIDATE_MULTIPLIER, DEFAULT_KNOWLEDGE_RATIO, DEFAULT_TOP_K, MAX_TOP_K,
};
use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub knowledge_store: KnowledgeStoreConfig,
    pub ingestion: IngestionSettings,
    pub retrieval: RetrievalSettings,
    pub rerank: RerankSettings,
    pub file_retrieval: FileRetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum EmbeddingBackend {
    #[default]
    #[serde(rename = "hashing")]
    Hashing,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingBackend,
    /// Provider default when unset
    pub model: Option<String>,
    pub dimensions: usize,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreBackend {
    #[default]
    InMemory,
    Pgvector,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorStoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub table_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeStoreBackend {
    #[default]
    InMemory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeStoreConfig {
    pub backend: KnowledgeStoreBackend,
    /// Falls back to the vector store's URL
    pub database_url: Option<String>,
    pub table_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub default_top_k: usize,
    pub min_score: f32,
    pub knowledge_ratio: f64,
    pub candidate_multiplier: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RerankSettings {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub weights: RerankWeights,
    pub recency_half_life_days: f64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Absent means file retrieval is disabled
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::default(),
            model: None,
            dimensions: 384,
            api_key: None,
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            database_url: None,
            max_connections: 10,
            table_name: "knowledge_vectors".to_string(),
        }
    }
}

impl Default for KnowledgeStoreConfig {
    fn default() -> Self {
        Self {
            backend: KnowledgeStoreBackend::default(),
            database_url: None,
            table_name: "knowledge_entries".to_string(),
        }
    }
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            batch_size: 64,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            min_score: 0.0,
            knowledge_ratio: DEFAULT_KNOWLEDGE_RATIO,
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
        }
    }
}

impl Default for RerankSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            api_key: None,
            model: "rerank-english-v3.0".to_string(),
            weights: RerankWeights::default(),
            recency_half_life_days: DEFAULT_RECENCY_HALF_LIFE_DAYS,
            timeout_secs: 10,
        }
    }
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl IngestionSettings {
    pub fn to_ingestion_config(&self) -> IngestionConfig {
        IngestionConfig::new(
            ChunkingConfig::new(self.chunk_size, self.chunk_overlap),
            self.batch_size,
        )
    }
}

impl RetrievalSettings {
    pub fn hybrid_config(&self) -> HybridConfig {
        HybridConfig::new(self.knowledge_ratio).with_candidate_multiplier(self.candidate_multiplier)
    }
}

impl KnowledgeStoreConfig {
    /// Own URL, or the vector store's when both live in one database
    pub fn resolved_database_url<'a>(&'a self, vector: &'a VectorStoreConfig) -> Option<&'a str> {
        self.database_url
            .as_deref()
            .or(vector.database_url.as_deref())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.ingestion
            .to_ingestion_config()
            .validate()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        self.retrieval.hybrid_config().validate()?;

        if self.retrieval.default_top_k == 0 || self.retrieval.default_top_k > MAX_TOP_K {
            return Err(DomainError::configuration(format!(
                "retrieval.default_top_k must be between 1 and {}",
                MAX_TOP_K
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(DomainError::configuration(
                "embedding.dimensions must be greater than 0",
            ));
        }

        if self.embedding.provider == EmbeddingBackend::OpenAi && self.embedding.api_key.is_none() {
            return Err(DomainError::configuration(
                "embedding.api_key is required for the openai provider",
            ));
        }

        if self.vector_store.backend == VectorStoreBackend::Pgvector
            && self.vector_store.database_url.is_none()
        {
            return Err(DomainError::configuration(
                "vector_store.database_url is required for the pgvector backend",
            ));
        }

        if self.knowledge_store.backend == KnowledgeStoreBackend::Postgres
            && self
                .knowledge_store
                .resolved_database_url(&self.vector_store)
                .is_none()
        {
            return Err(DomainError::configuration(
                "knowledge_store.database_url is required for the postgres backend",
            ));
        }

        self.rerank
            .weights
            .validate()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let half_life = self.rerank.recency_half_life_days;
        if !half_life.is_finite() || half_life <= 0.0 {
            return Err(DomainError::configuration(format!(
                "rerank.recency_half_life_days must be greater than 0, got {}",
                half_life
            )));
        }

        if self.rerank.enabled && self.rerank.base_url.is_none() {
            return Err(DomainError::configuration(
                "rerank.base_url is required when reranking is enabled",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.ingestion.batch_size, 64);
        assert_eq!(config.vector_store.table_name, "knowledge_vectors");
    }

    #[test]
    fn test_zero_batch_size_is_configuration_error() {
        let mut config = AppConfig::default();
        config.ingestion.batch_size = 0;

        assert!(matches!(config.validate(), Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_ratio_out_of_range() {
        let mut config = AppConfig::default();
        config.retrieval.knowledge_ratio = 1.5;

        assert!(matches!(config.validate(), Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_pgvector_requires_url() {
        let mut config = AppConfig::default();
        config.vector_store.backend = VectorStoreBackend::Pgvector;
        assert!(config.validate().is_err());

        config.vector_store.database_url = Some("postgres://localhost/kb".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_knowledge_store_shares_vector_url() {
        let mut config = AppConfig::default();
        config.vector_store.database_url = Some("postgres://db/kb".into());
        config.knowledge_store.backend = KnowledgeStoreBackend::Postgres;

        assert!(config.validate().is_ok());
        assert_eq!(
            config
                .knowledge_store
                .resolved_database_url(&config.vector_store),
            Some("postgres://db/kb")
        );
    }

    #[test]
    fn test_openai_requires_api_key() {
        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingBackend::OpenAi;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_rerank_weight_rejected() {
        let mut config = AppConfig::default();
        config.rerank.weights = RerankWeights::new(0.7, -0.2, 0.1);

        assert!(matches!(config.validate(), Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_non_positive_half_life_rejected() {
        for half_life in [0.0, -3.0, f64::NAN] {
            let mut config = AppConfig::default();
            config.rerank.recency_half_life_days = half_life;

            assert!(matches!(config.validate(), Err(DomainError::Configuration { .. })));
        }
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "embedding": {"provider": "openai", "api_key": "sk"},
            "vector_store": {"backend": "pgvector", "database_url": "postgres://x"}
        }))
        .unwrap();

        assert_eq!(config.embedding.provider, EmbeddingBackend::OpenAi);
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.vector_store.backend, VectorStoreBackend::Pgvector);
        assert_eq!(config.vector_store.max_connections, 10);
    }
}
