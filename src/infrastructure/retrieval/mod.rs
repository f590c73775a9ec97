//! Retrieval strategies and the retrieval service

mod factory;
mod fallback;
mod files;
mod indexed;
mod scan;
mod service;

pub use factory::RetrievalFactory;
pub use fallback::FallbackSearcher;
pub use files::{DisabledFileRetriever, FileQueryOutcome, HttpFileRetriever, ResilientFileRetriever};
pub use indexed::IndexedSearcher;
pub use scan::ScanSearcher;
pub use service::RetrievalService;
