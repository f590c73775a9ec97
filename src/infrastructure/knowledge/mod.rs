//! Knowledge record store implementations

mod in_memory;
mod postgres;

use std::sync::Arc;

pub use in_memory::InMemoryKnowledgeRecordStore;
pub use postgres::PostgresKnowledgeRecordStore;

use crate::config::{KnowledgeStoreBackend, KnowledgeStoreConfig, VectorStoreConfig};
use crate::domain::knowledge::KnowledgeRecordStore;
use crate::domain::DomainError;
use crate::infrastructure::vector_store::PgPoolRegistry;

/// Create the configured record store, sharing pools with the vector store
pub async fn create_record_store(
    config: &KnowledgeStoreConfig,
    vector_config: &VectorStoreConfig,
    pools: &PgPoolRegistry,
) -> Result<Arc<dyn KnowledgeRecordStore>, DomainError> {
    match config.backend {
        KnowledgeStoreBackend::InMemory => Ok(Arc::new(InMemoryKnowledgeRecordStore::new())),
        KnowledgeStoreBackend::Postgres => {
            let url = config.resolved_database_url(vector_config).ok_or_else(|| {
                DomainError::configuration("postgres record store requires a database_url")
            })?;
            let store = PostgresKnowledgeRecordStore::new(pools.pool(url).await?, &config.table_name)?;

            if let Err(e) = store.ensure_table().await {
                tracing::warn!(
                    table = %config.table_name,
                    error = %e,
                    "Could not prepare knowledge entry table"
                );
            }

            Ok(Arc::new(store))
        }
    }
}
