//! # REST API
//!
//! REST endpoints using axum for sync and query operations.
//!
//! This module provides the HTTP surface of the restaurant sync service:
//! an endpoint to run the daily ingestion, and read endpoints over the
//! synced buyers, products, and transactions.
//!
//! # Endpoints
//!
//! ## Sync
//! - `POST /api/v1/sync/{date}` - Load one calendar date from the feeds
//!
//! ## Buyers
//! - `GET /api/v1/buyers` - Paged buyer listing
//! - `GET /api/v1/buyers/{id}` - Aggregated buyer detail view
//!
//! ## Products
//! - `GET /api/v1/products` - Resolve a comma-separated product id list
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use restaurant_sync::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState {
//!     ingestion: /* ... */,
//!     views: /* ... */,
//! });
//!
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, DetailParams, ErrorResponse, HealthResponse, PaginationParams, ProductParams,
    RestError, SyncResponse,
};
pub use routes::create_router;
