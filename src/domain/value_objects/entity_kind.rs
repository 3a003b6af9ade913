//! # Entity Kind
//!
//! The three record kinds the engine synchronizes.
//!
//! Each kind maps to a feed endpoint path and to the type tag stored on its
//! nodes in the graph store. The ingestion coordinator runs one sub-pipeline
//! per kind.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::value_objects::entity_kind::EntityKind;
//!
//! assert_eq!(EntityKind::Buyer.type_tag(), "Buyer");
//! assert_eq!(EntityKind::Transaction.feed_path(), "transactions");
//! assert_eq!(EntityKind::ALL.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three synchronized record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A purchaser record.
    Buyer,
    /// A catalog product record.
    Product,
    /// A purchase transaction record.
    Transaction,
}

impl EntityKind {
    /// Every kind, in pipeline launch order.
    pub const ALL: [Self; 3] = [Self::Buyer, Self::Product, Self::Transaction];

    /// Number of kinds; sizes the coordinator's result channel.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the node type tag used by the graph store.
    ///
    /// # Examples
    ///
    /// ```
    /// use restaurant_sync::domain::value_objects::entity_kind::EntityKind;
    ///
    /// assert_eq!(EntityKind::Product.type_tag(), "Product");
    /// ```
    #[inline]
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Product => "Product",
            Self::Transaction => "Transaction",
        }
    }

    /// Returns the feed endpoint path segment for this kind.
    #[inline]
    #[must_use]
    pub const fn feed_path(&self) -> &'static str {
        match self {
            Self::Buyer => "buyers",
            Self::Product => "products",
            Self::Transaction => "transactions",
        }
    }

    /// Returns the id predicate name stored on nodes of this kind.
    #[inline]
    #[must_use]
    pub const fn id_predicate(&self) -> &'static str {
        match self {
            Self::Buyer => "BuyerId",
            Self::Product => "ProductId",
            Self::Transaction => "TransactionId",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_tag())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn type_tags() {
        assert_eq!(EntityKind::Buyer.type_tag(), "Buyer");
        assert_eq!(EntityKind::Product.type_tag(), "Product");
        assert_eq!(EntityKind::Transaction.type_tag(), "Transaction");
    }

    #[test]
    fn feed_paths() {
        assert_eq!(EntityKind::Buyer.feed_path(), "buyers");
        assert_eq!(EntityKind::Product.feed_path(), "products");
        assert_eq!(EntityKind::Transaction.feed_path(), "transactions");
    }

    #[test]
    fn id_predicates() {
        assert_eq!(EntityKind::Buyer.id_predicate(), "BuyerId");
        assert_eq!(EntityKind::Product.id_predicate(), "ProductId");
        assert_eq!(EntityKind::Transaction.id_predicate(), "TransactionId");
    }

    #[test]
    fn all_covers_every_kind() {
        assert_eq!(
            EntityKind::ALL,
            [
                EntityKind::Buyer,
                EntityKind::Product,
                EntityKind::Transaction
            ]
        );
        assert_eq!(EntityKind::COUNT, 3);
    }

    #[test]
    fn display_matches_type_tag() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string(), kind.type_tag());
        }
    }
}
