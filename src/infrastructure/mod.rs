//! # Infrastructure Layer
//!
//! Adapters for the outside world.
//!
//! - [`feeds`]: HTTP clients and parsers for the upstream record feeds
//! - [`store`]: graph-store ports, the Dgraph adapter, and mutation
//!   encoding

pub mod feeds;
pub mod store;
