use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::voice::VoiceCatalog;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(catalog): State<Arc<VoiceCatalog>>) -> impl IntoResponse {
    if catalog.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "voices": 0
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "voices": catalog.len()
        })),
    )
}
