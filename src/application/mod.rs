//! # Application Layer
//!
//! Use-case orchestration between the domain and the infrastructure
//! adapters: the ingestion run, the recommendation miner, and the read
//! models behind the HTTP surface, plus the error type they share.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{IngestionService, RecommendationService, ViewService};
