//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database reachable)
//!
//! # Wardrobe
//! POST /api/wardrobe/upload    - Classify an image and store a new item
//! GET  /api/wardrobe           - List items for ?userId=
//! ```

pub mod wardrobe;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the wardrobe API router.
///
/// `max_upload_bytes` bounds the upload request body.
pub fn wardrobe_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(wardrobe::list))
        .route(
            "/upload",
            post(wardrobe::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

/// Create all routes for the service.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/wardrobe", wardrobe_routes(max_upload_bytes))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.items().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
