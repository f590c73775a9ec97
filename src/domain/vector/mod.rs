//! Vector records, the vector store boundary and similarity math

mod record;
mod similarity;
mod store;

pub use record::VectorRecord;
pub use similarity::{cosine_similarity, l2_normalize};
pub use store::{brute_force_search, VectorStore};

#[cfg(test)]
pub use store::mock::MockVectorStore;
