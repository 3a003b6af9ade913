//! # Domain Layer
//!
//! Core business types with no I/O dependencies: the synchronized record
//! kinds, the run lifecycle, and the validation errors callers can provoke.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::{Buyer, LoadOutcome, LoadSummary, Product, Transaction};
pub use errors::{DomainError, DomainResult};
pub use value_objects::{BuyerId, EntityKind, LoadDate, LoadState, ProductId, TransactionId};
