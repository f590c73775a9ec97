//! Retrieval domain - queries, results and search strategies

mod config;
mod file_retriever;
mod query;
mod result;
mod searcher;

pub use config::{HybridConfig, DEFAULT_CANDIDATE_MULTIPLIER, DEFAULT_KNOWLEDGE_RATIO};
pub use file_retriever::{FileChunkMatch, FileRetriever};
pub use query::{HybridQuery, RetrievalQuery, DEFAULT_TOP_K, MAX_TOP_K};
pub use result::{assign_ranks, sort_by_score, RetrievalResponse, RetrievalResult};
pub use searcher::{SearchOutcome, VectorSearcher};

#[cfg(test)]
pub use file_retriever::mock::MockFileRetriever;
#[cfg(test)]
pub use searcher::mock::MockVectorSearcher;
