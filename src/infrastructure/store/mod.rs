//! # Graph Store Layer
//!
//! Ports and adapters for the graph store holding ingested records.
//!
//! ## Ports
//!
//! - [`GraphStore`]: reads plus the entry point for a load transaction
//! - [`LoadTransaction`]: deferred-commit write side of one load run
//!
//! ## Implementations
//!
//! - [`DgraphStore`]: Dgraph over its HTTP API
//! - [`InMemoryStore`]: in-memory store for tests and local runs
//!
//! [`mutation`] builds the typed JSON node payloads both sides share.

pub mod dgraph;
pub mod error;
pub mod in_memory;
pub mod mutation;
pub mod traits;

pub use dgraph::DgraphStore;
pub use error::{StoreError, StoreResult};
pub use in_memory::InMemoryStore;
pub use mutation::{encode_batch, GraphRecord, MutationPayload, Persister};
pub use traits::{GraphStore, LoadTransaction};
