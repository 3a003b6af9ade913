//! # Buyer Entity
//!
//! A purchaser record synchronized from the buyer feed.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::entities::buyer::Buyer;
//! use restaurant_sync::domain::value_objects::{BuyerId, LoadDate};
//!
//! let date = LoadDate::parse("2020-08-17").unwrap();
//! let buyer = Buyer::new(BuyerId::new("ff0d1362"), 34, "Isabel Banks", date);
//!
//! assert_eq!(buyer.name(), "Isabel Banks");
//! assert_eq!(buyer.age(), 34);
//! ```

use crate::domain::value_objects::{BuyerId, LoadDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A purchaser known to the store.
///
/// The serialized shape (`BuyerId`, `Age`, `Name`, `Date`) is shared by the
/// store mutation format, store query results, and the read API. `Date` is
/// the load date the record was ingested under; the idempotency gate keys
/// off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Buyer {
    buyer_id: BuyerId,
    age: i32,
    name: String,
    date: LoadDate,
}

impl Buyer {
    /// Creates a buyer record.
    #[must_use]
    pub fn new(buyer_id: BuyerId, age: i32, name: impl Into<String>, date: LoadDate) -> Self {
        Self {
            buyer_id,
            age,
            name: name.into(),
            date,
        }
    }

    // ========== Accessors ==========

    /// Returns the buyer id.
    #[inline]
    #[must_use]
    pub fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    /// Returns the buyer's age as reported by the feed.
    #[inline]
    #[must_use]
    pub const fn age(&self) -> i32 {
        self.age
    }

    /// Returns the buyer's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the load date this record was ingested under.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> LoadDate {
        self.date
    }
}

impl fmt::Display for Buyer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buyer {} ({})", self.buyer_id, self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Buyer {
        Buyer::new(
            BuyerId::new("ff0d1362"),
            34,
            "Isabel Banks",
            LoadDate::parse("2020-08-17").unwrap(),
        )
    }

    mod construction {
        use super::*;

        #[test]
        fn accessors_return_fields() {
            let buyer = sample();
            assert_eq!(buyer.buyer_id().as_str(), "ff0d1362");
            assert_eq!(buyer.age(), 34);
            assert_eq!(buyer.name(), "Isabel Banks");
            assert_eq!(buyer.date().to_string(), "2020-08-17");
        }

        #[test]
        fn display_includes_id_and_name() {
            let s = sample().to_string();
            assert!(s.contains("ff0d1362"));
            assert!(s.contains("Isabel Banks"));
        }
    }

    mod serde_shape {
        use super::*;

        #[test]
        fn serializes_pascal_case() {
            let json = serde_json::to_value(sample()).unwrap();
            assert_eq!(json["BuyerId"], "ff0d1362");
            assert_eq!(json["Age"], 34);
            assert_eq!(json["Name"], "Isabel Banks");
            assert_eq!(json["Date"], "2020-08-17");
        }

        #[test]
        fn round_trips() {
            let buyer = sample();
            let json = serde_json::to_string(&buyer).unwrap();
            let back: Buyer = serde_json::from_str(&json).unwrap();
            assert_eq!(buyer, back);
        }

        #[test]
        fn ignores_store_metadata_fields() {
            let json = r#"{
                "BuyerId": "b1",
                "Age": 20,
                "Name": "A",
                "Date": "2020-08-17",
                "dgraph.type": "Buyer",
                "uid": "0x2a"
            }"#;
            let buyer: Buyer = serde_json::from_str(json).unwrap();
            assert_eq!(buyer.buyer_id().as_str(), "b1");
        }
    }
}
