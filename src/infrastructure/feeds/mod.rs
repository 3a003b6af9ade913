//! # Feed Infrastructure
//!
//! Everything between the upstream feeds and structured entities: the HTTP
//! client and the three format decoders.
//!
//! The feeds share a base URL and a `date` query parameter but nothing
//! else — buyers arrive as JSON, products as apostrophe-delimited lines,
//! transactions as a NUL-delimited record stream. The parsers absorb every
//! formatting quirk here so nothing downstream ever sees raw feed text.

pub mod buyers;
pub mod client;
pub mod error;
pub mod products;
pub mod transactions;

pub use buyers::parse_buyers;
pub use client::{FeedClient, FeedSource};
pub use error::{FeedError, FeedResult, ParseError, ParseResult};
pub use products::parse_products;
pub use transactions::parse_transactions;
