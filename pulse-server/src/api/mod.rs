//! API Module
//!
//! HTTP surface for operators: a status page, a JSON status endpoint, a
//! liveness check and the manual trigger.

pub mod health;
pub mod status;
pub mod trigger;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::service::TriggerCoordinator;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<TriggerCoordinator>,
    /// Cron expression as configured
    pub schedule: Arc<str>,
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::index))
        .route("/status", get(status::status))
        .route("/health", get(health::health_check))
        .route("/run-manually", get(trigger::run_manually))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
