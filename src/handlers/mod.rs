//! HTTP Handlers

pub mod auth;
pub mod events;
pub mod users;

use axum::{response::IntoResponse, Json};
use chrono::Utc;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
