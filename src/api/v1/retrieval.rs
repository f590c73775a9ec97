//! Retrieval and search endpoints

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, RetrieveRequest, SearchRequest};
use crate::domain::retrieval::RetrievalResponse;

/// POST /v1/retrieve
pub async fn retrieve(
    State(state): State<AppState>,
    Json(request): Json<RetrieveRequest>,
) -> Result<Json<RetrievalResponse>, ApiError> {
    let defaults = &state.retrieval_defaults;
    let query = request.into_query(defaults.default_top_k, defaults.min_score);
    debug!(top_k = query.top_k, "Retrieving knowledge");

    let response = state.knowledge.retrieve(&query).await?;

    Ok(Json(response))
}

/// POST /v1/search
///
/// Hybrid retrieval over knowledge and files, then reranked.
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<RetrievalResponse>, ApiError> {
    let defaults = &state.retrieval_defaults;
    let (query, options) = request.into_parts(defaults.default_top_k, defaults.min_score);
    debug!(
        top_k = query.base.top_k,
        files = query.file_ids.len(),
        enhanced = options.enhanced,
        "Searching knowledge"
    );

    let response = state.knowledge.search(&query, &options).await?;

    Ok(Json(response))
}
