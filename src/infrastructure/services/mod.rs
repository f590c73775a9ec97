//! Infrastructure services

mod knowledge_service;

pub use knowledge_service::{AddEntryRequest, KnowledgeService};
