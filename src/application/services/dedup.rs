//! # Record Deduplication
//!
//! First-wins duplicate filtering for incoming record batches.
//!
//! A batch is filtered against two sources of duplicates: ids already in
//! the store (from earlier dates) and repeats inside the batch itself.
//! The first occurrence of an id survives, later ones are dropped.
//! Purchase records are exempt; every transaction line that parses is
//! kept.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::application::services::dedup::DedupFilter;
//! use restaurant_sync::domain::entities::Buyer;
//! use restaurant_sync::domain::value_objects::{BuyerId, LoadDate};
//! use std::collections::HashSet;
//!
//! let date = LoadDate::parse("2020-08-17")?;
//! let known: HashSet<String> = ["b1".to_string()].into_iter().collect();
//! let filter = DedupFilter::new(known);
//!
//! let batch = vec![
//!     Buyer::new(BuyerId::new("b1"), 30, "Old", date),
//!     Buyer::new(BuyerId::new("b2"), 41, "New", date),
//! ];
//! let outcome = filter.filter(batch);
//! assert_eq!(outcome.kept.len(), 1);
//! assert_eq!(outcome.dropped, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashSet;

use crate::domain::entities::{Buyer, Product};

/// A record that deduplicates on a string id.
pub trait DedupRecord {
    /// Returns the id this record deduplicates on.
    fn dedup_id(&self) -> &str;
}

impl DedupRecord for Buyer {
    fn dedup_id(&self) -> &str {
        self.buyer_id().as_str()
    }
}

impl DedupRecord for Product {
    fn dedup_id(&self) -> &str {
        self.product_id().as_str()
    }
}

/// Result of filtering one batch.
#[derive(Debug)]
pub struct DedupOutcome<R> {
    /// Records that survived, in batch order.
    pub kept: Vec<R>,
    /// Number of records dropped as duplicates.
    pub dropped: usize,
}

/// First-wins duplicate filter seeded with the store's known ids.
#[derive(Debug)]
pub struct DedupFilter {
    known: HashSet<String>,
}

impl DedupFilter {
    /// Creates a filter over the given set of already-stored ids.
    #[must_use]
    pub fn new(known: HashSet<String>) -> Self {
        Self { known }
    }

    /// Filters a batch, keeping the first occurrence of each unseen id.
    #[must_use]
    pub fn filter<R: DedupRecord>(&self, batch: Vec<R>) -> DedupOutcome<R> {
        let total = batch.len();
        let mut seen: HashSet<String> = HashSet::new();
        let kept: Vec<R> = batch
            .into_iter()
            .filter(|record| {
                let id = record.dedup_id();
                !self.known.contains(id) && seen.insert(id.to_string())
            })
            .collect();
        let dropped = total - kept.len();
        DedupOutcome { kept, dropped }
    }
}
