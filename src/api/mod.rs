//! # API Layer
//!
//! External interfaces to the service. REST is the only surface; the
//! feeds stay outbound-only.

pub mod rest;

pub use rest::{create_router, AppState};
