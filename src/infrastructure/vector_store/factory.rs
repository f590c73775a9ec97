//! Vector store factory

use std::sync::Arc;

use crate::config::{VectorStoreBackend, VectorStoreConfig};
use crate::domain::vector::VectorStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryVectorStore;
use super::pgvector::PgvectorVectorStore;
use super::registry::PgPoolRegistry;

/// Factory for creating the configured vector store
#[derive(Debug)]
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Create the store; an unreachable pgvector database only logs a warning
    /// so retrieval can fall back to scanning the record store
    pub async fn create(
        config: &VectorStoreConfig,
        dimensions: usize,
        pools: &PgPoolRegistry,
    ) -> Result<Arc<dyn VectorStore>, DomainError> {
        match config.backend {
            VectorStoreBackend::InMemory => {
                Ok(Arc::new(InMemoryVectorStore::new().with_dimensions(dimensions)))
            }
            VectorStoreBackend::Pgvector => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    DomainError::configuration("pgvector backend requires vector_store.database_url")
                })?;
                let pool = pools.pool(url).await?;
                let store = PgvectorVectorStore::new(pool, &config.table_name, dimensions)?;

                if let Err(e) = store.ensure_schema().await {
                    tracing::warn!(
                        table = %config.table_name,
                        error = %e,
                        "Could not prepare pgvector schema; indexed search may be unavailable"
                    );
                }

                Ok(Arc::new(store))
            }
        }
    }
}
