use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::db::ReadinessCheck;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(database): State<Arc<dyn ReadinessCheck>>) -> impl IntoResponse {
    if database.is_ready().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "database": "disconnected"
            })),
        )
    }
}
