//! Vector store implementations

mod factory;
mod in_memory;
mod pgvector;
mod registry;

pub use factory::VectorStoreFactory;
pub use in_memory::InMemoryVectorStore;
pub use pgvector::{embedding_to_pgvector, validate_table_name, PgvectorVectorStore};
pub use registry::{ConnectionRegistry, PgPoolRegistry};
