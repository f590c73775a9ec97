//! Knowledge entry endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, DeleteEntryResponse, EntryCreatedResponse, EntryListResponse, EntryResponse, Json,
};
use crate::infrastructure::services::AddEntryRequest;

/// POST /v1/entries
pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<EntryCreatedResponse>), ApiError> {
    debug!(entry_type = %request.entry_type, "Creating knowledge entry");

    let entry = state.knowledge.add_entry(request).await?;

    Ok((StatusCode::CREATED, Json(EntryCreatedResponse { id: entry.id })))
}

/// GET /v1/entries/{entry_id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state.knowledge.get_entry(&entry_id).await?;

    Ok(Json(EntryResponse::from(entry)))
}

/// GET /v1/entries/{entry_id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Result<Json<EntryListResponse>, ApiError> {
    let children = state.knowledge.list_children(&entry_id).await?;

    let entries: Vec<EntryResponse> = children.into_iter().map(EntryResponse::from).collect();
    let total = entries.len();

    Ok(Json(EntryListResponse { entries, total }))
}

/// DELETE /v1/entries/{entry_id}
///
/// Removes the entry together with its descendants; `deleted` is false when
/// nothing matched.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Result<Json<DeleteEntryResponse>, ApiError> {
    debug!(entry_id = %entry_id, "Deleting knowledge entry");

    let deleted = state.knowledge.delete_entry(&entry_id).await?;

    Ok(Json(DeleteEntryResponse { deleted }))
}
