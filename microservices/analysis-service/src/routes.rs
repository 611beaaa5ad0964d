//! Router configuration for the Analysis Service API

use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Metrics
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/stats", get(handlers::stats))
        // Analysis
        .route("/analysis", get(handlers::analysis))
        .with_state(state)
}
