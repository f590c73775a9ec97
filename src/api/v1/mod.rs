//! Versioned knowledge API

pub mod entries;
pub mod retrieval;
pub mod sources;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/entries", post(entries::create_entry))
        .route(
            "/entries/{entry_id}",
            get(entries::get_entry).delete(entries::delete_entry),
        )
        .route("/entries/{entry_id}/children", get(entries::list_children))
        .route(
            "/sources/{source_id}",
            post(sources::ingest_source)
                .get(sources::get_source)
                .delete(sources::delete_source),
        )
        .route("/retrieve", post(retrieval::retrieve))
        .route("/search", post(retrieval::search))
}
