//! API request, response and error types

pub mod error;
pub mod json;
pub mod knowledge;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use knowledge::{
    DeleteEntryResponse, DeleteSourceResponse, EntryCreatedResponse, EntryListResponse,
    EntryResponse, IngestSourceRequest, IngestSourceResponse, RetrieveRequest, SearchRequest,
    SourceStatsResponse,
};
