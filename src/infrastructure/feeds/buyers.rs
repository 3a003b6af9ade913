//! # Buyer Feed Parser
//!
//! Decodes the buyer feed, the only one of the three that is plain JSON:
//! an array of `{"id", "age", "name"}` objects. Missing fields default
//! rather than fail, matching the feed's loose schema, but a body that is
//! not a JSON array at all rejects the whole batch.

use crate::domain::entities::Buyer;
use crate::domain::value_objects::{BuyerId, LoadDate};
use crate::infrastructure::feeds::error::{ParseError, ParseResult};
use serde::Deserialize;

/// Wire shape of one buyer feed entry.
#[derive(Debug, Deserialize)]
struct FeedBuyer {
    #[serde(default)]
    id: String,
    #[serde(default)]
    age: i32,
    #[serde(default)]
    name: String,
}

/// Parses a raw buyer feed body into buyers stamped with `date`.
///
/// # Errors
///
/// Returns [`ParseError::BuyerJson`] when the body is not a JSON array of
/// buyer objects; no partial batch is produced.
pub fn parse_buyers(raw: &str, date: LoadDate) -> ParseResult<Vec<Buyer>> {
    let entries: Vec<FeedBuyer> =
        serde_json::from_str(raw).map_err(|e| ParseError::buyer_json(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|entry| Buyer::new(BuyerId::new(entry.id), entry.age, entry.name, date))
        .collect())
}
