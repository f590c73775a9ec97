//! Knowledge entries - typed records that back retrieval

mod entry;
mod filter;
mod payload;
mod repository;
mod validation;

pub use entry::{EntryType, KnowledgeEntry, ScopeMetadata};
pub use filter::RetrievalFilter;
pub use payload::{
    BusinessDocumentPayload, ColumnDescription, EntryPayload, FileChunkPayload,
    QuestionAnswerPayload, SchemaDescriptionPayload, SynonymPayload,
};
pub use repository::KnowledgeRecordStore;
pub use validation::{validate_entry_id, validate_source_id, IdValidationError, MAX_ID_LENGTH};

#[cfg(test)]
pub use repository::mock::MockKnowledgeRecordStore;
