//! # REST Routes
//!
//! Route table and middleware for the HTTP surface.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::rest::handlers::{self, AppState};

/// Builds the REST router.
///
/// Applies permissive CORS and per-request tracing on top of the route
/// table.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/sync/{date}", post(handlers::sync_date))
        .route("/api/v1/buyers", get(handlers::list_buyers))
        .route("/api/v1/buyers/{id}", get(handlers::buyer_detail))
        .route("/api/v1/products", get(handlers::list_products))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
