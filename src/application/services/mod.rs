//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`IngestionService`]: Concurrent feed ingestion with a deferred commit
//! - [`RecommendationService`]: Co-purchase product suggestions
//! - [`ViewService`]: Read models for the HTTP surface

pub mod dedup;
pub mod ingestion;
pub mod recommendation;
pub mod views;

pub use dedup::{DedupFilter, DedupOutcome, DedupRecord};
pub use ingestion::IngestionService;
pub use recommendation::{RecommendationConfig, RecommendationService};
pub use views::{
    BuyerCollection, BuyerDetailView, DetailPageParams, SameIpBuyers, TransactionHistory,
    ViewService,
};
