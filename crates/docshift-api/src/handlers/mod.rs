//! HTTP handlers

pub mod convert;
pub mod download;
pub mod health;

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Fallback for every unmatched route
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}
