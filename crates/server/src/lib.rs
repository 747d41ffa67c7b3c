//! Wardrobe server library.
//!
//! Classifies uploaded clothing images with Cloud Vision and stores the
//! inferred wardrobe items in `PostgreSQL`. Exposed as a library so the
//! router can be exercised in tests with substitute stores and detectors.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary so tests don't need a client.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    routes::routes(max_upload_bytes)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
        .with_state(state)
}
