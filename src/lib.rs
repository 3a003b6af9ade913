//! # Restaurant Sync
//!
//! Purchase data sync engine over a Dgraph graph store.
//!
//! Three upstream feeds publish a restaurant's daily records in three
//! different shapes: buyers as JSON, products as a quote-delimited CSV
//! dialect, and transactions as a NUL-framed line format. For a given
//! calendar date this crate fetches all three concurrently, parses each
//! shape, drops records the store already knows, stages everything in a
//! single transaction, and commits once. A date is either fully loaded
//! or absent; re-syncing a loaded date is a no-op.
//!
//! On top of the synced graph it serves read models: a paged buyer
//! listing, an aggregated buyer detail view (purchase history, buyers
//! behind the same IP addresses, co-purchase product suggestions), and
//! product lookups.
//!
//! # Architecture
//!
//! - [`domain`] - Entities, identifiers, dates, and the load state machine
//! - [`application`] - Ingestion coordinator, recommendation miner, read models
//! - [`infrastructure`] - Feed client/parsers and the graph store adapters
//! - [`api`] - The axum REST surface
//! - [`config`] - Layered runtime configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use restaurant_sync::api::rest::{create_router, AppState};
//! use restaurant_sync::application::services::{
//!     IngestionService, RecommendationService, ViewService,
//! };
//! use restaurant_sync::infrastructure::feeds::FeedClient;
//! use restaurant_sync::infrastructure::store::{DgraphStore, GraphStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let feeds = Arc::new(FeedClient::new("https://feeds.example.com", 10_000)?);
//! let store: Arc<dyn GraphStore> = Arc::new(DgraphStore::new("http://localhost:8080", 60_000)?);
//!
//! let ingestion = Arc::new(IngestionService::new(feeds, Arc::clone(&store)));
//! let recommender = Arc::new(RecommendationService::with_defaults(Arc::clone(&store)));
//! let views = Arc::new(ViewService::new(Arc::clone(&store), recommender));
//!
//! let router = create_router(Arc::new(AppState { ingestion, views }));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:9000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
