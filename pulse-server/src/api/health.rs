//! Health check handler

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
/// Liveness check, independent of the run state
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
