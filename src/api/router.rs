use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::mock::in_memory_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let router = create_router(in_memory_state());

        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&router, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "vector_store");

        let (status, _) = send(&router, Method::GET, "/live", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let router = create_router(in_memory_state());

        let (status, created) = send(
            &router,
            Method::POST,
            "/v1/entries",
            Some(json!({
                "type": "question-answer",
                "payload": { "question": "What is churn?", "answer": "Cancelled over active" },
                "owner_id": "u1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, entry) = send(&router, Method::GET, &format!("/v1/entries/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["type"], "question-answer");
        assert_eq!(entry["embedded"], true);

        let (status, children) =
            send(&router, Method::GET, &format!("/v1/entries/{}/children", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(children["total"], 0);

        let (status, deleted) = send(&router, Method::DELETE, &format!("/v1/entries/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["deleted"], true);

        let (status, body) = send(&router, Method::GET, &format!("/v1/entries/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");

        let (status, again) = send(&router, Method::DELETE, &format!("/v1/entries/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["deleted"], false);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_bad_request() {
        let router = create_router(in_memory_state());

        let (status, body) = send(
            &router,
            Method::POST,
            "/v1/entries",
            Some(json!({ "type": "synonym", "payload": { "term": "rev" } })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_unknown_entry_type_is_rejected() {
        let router = create_router(in_memory_state());

        let (status, body) = send(
            &router,
            Method::POST,
            "/v1/entries",
            Some(json!({ "type": "poem", "payload": {} })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_source_ingest_retrieve_delete() {
        let router = create_router(in_memory_state());
        let text = "Quarterly revenue grew in the northern region. ".repeat(6);

        let (status, ingested) = send(
            &router,
            Method::POST,
            "/v1/sources/report-q3",
            Some(json!({ "text": text, "owner_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let records = ingested["records"].as_u64().unwrap();
        assert!(records > 1);

        let (status, stats) = send(&router, Method::GET, "/v1/sources/report-q3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["records"].as_u64(), Some(records));

        let (status, found) = send(
            &router,
            Method::POST,
            "/v1/retrieve",
            Some(json!({ "query": "Quarterly revenue grew in the northern region.", "top_k": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["results"].as_array().unwrap().len(), 3);
        assert_eq!(found["results"][0]["source_id"], "report-q3");

        let (status, deleted) = send(&router, Method::DELETE, "/v1/sources/report-q3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["deleted"].as_u64(), Some(records));

        let (_, stats) = send(&router, Method::GET, "/v1/sources/report-q3", None).await;
        assert_eq!(stats["records"], 0);
    }

    #[tokio::test]
    async fn test_search_without_reranker() {
        let router = create_router(in_memory_state());
        for (question, answer) in [("What is churn?", "Cancelled over active"), ("What is ARR?", "Annual recurring revenue")] {
            send(
                &router,
                Method::POST,
                "/v1/entries",
                Some(json!({ "type": "question-answer", "payload": { "question": question, "answer": answer } })),
            )
            .await;
        }

        let (status, body) = send(
            &router,
            Method::POST,
            "/v1/search",
            Some(json!({ "query": "What is churn?", "top_k": 2, "rerank": { "enhanced": true } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reranked"], false);
        assert_eq!(body["results"][0]["rank"], 1);
    }

    #[tokio::test]
    async fn test_search_rejects_zero_top_k() {
        let router = create_router(in_memory_state());

        let (status, _) = send(
            &router,
            Method::POST,
            "/v1/search",
            Some(json!({ "query": "anything", "top_k": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
