//! # Domain Entities
//!
//! The record types the engine synchronizes and the outcome of a run.
//!
//! ## Records
//!
//! - [`Buyer`]: a purchaser (`BuyerId`, `Age`, `Name`, `Date`)
//! - [`Product`]: a catalog product with an exact decimal price
//! - [`Transaction`]: a purchase linking a buyer, an origin IP and device,
//!   and the products bought together
//!
//! ## Run Results
//!
//! - [`LoadSummary`] / [`LoadOutcome`]: what a sync run produced
//!
//! All three record types share one serialized shape (PascalCase field
//! names) across the store mutation format, store query results, and the
//! read API.

pub mod buyer;
pub mod load_summary;
pub mod product;
pub mod transaction;

pub use buyer::Buyer;
pub use load_summary::{LoadOutcome, LoadSummary};
pub use product::Product;
pub use transaction::Transaction;
