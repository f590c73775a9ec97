//! File source ingestion endpoints

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, DeleteSourceResponse, IngestSourceRequest, IngestSourceResponse, Json,
    SourceStatsResponse,
};

/// POST /v1/sources/{source_id}
///
/// Replaces whatever the source held before.
pub async fn ingest_source(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
    Json(request): Json<IngestSourceRequest>,
) -> Result<Json<IngestSourceResponse>, ApiError> {
    debug!(source_id = %source_id, bytes = request.text.len(), "Ingesting source");

    let result = state
        .knowledge
        .ingest_file(request.into_ingest_request(source_id))
        .await?;

    Ok(Json(IngestSourceResponse::from(result)))
}

/// GET /v1/sources/{source_id}
pub async fn get_source(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
) -> Result<Json<SourceStatsResponse>, ApiError> {
    let records = state.knowledge.count_source(&source_id).await?;

    Ok(Json(SourceStatsResponse { source_id, records }))
}

/// DELETE /v1/sources/{source_id}
pub async fn delete_source(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
) -> Result<Json<DeleteSourceResponse>, ApiError> {
    let deleted = state.knowledge.delete_source(&source_id).await?;

    Ok(Json(DeleteSourceResponse { deleted }))
}
