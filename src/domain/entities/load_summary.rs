//! # Load Summary
//!
//! Outcome types for a sync run.
//!
//! A successful run produces a [`LoadSummary`] with the accepted batches.
//! A run whose date was already in the store produces the distinct
//! [`LoadOutcome::AlreadyLoaded`] value — not an error, just nothing to do.

use crate::domain::entities::{Buyer, Product, Transaction};
use crate::domain::value_objects::LoadDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The accepted record batches of a committed sync run.
///
/// Counts here are post-dedup: records dropped against store history or
/// within their own batch never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    date: LoadDate,
    buyers: Vec<Buyer>,
    products: Vec<Product>,
    transactions: Vec<Transaction>,
}

impl LoadSummary {
    /// Creates a summary from the accepted batches.
    #[must_use]
    pub fn new(
        date: LoadDate,
        buyers: Vec<Buyer>,
        products: Vec<Product>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            date,
            buyers,
            products,
            transactions,
        }
    }

    // ========== Accessors ==========

    /// Returns the loaded date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> LoadDate {
        self.date
    }

    /// Returns the accepted buyers.
    #[inline]
    #[must_use]
    pub fn buyers(&self) -> &[Buyer] {
        &self.buyers
    }

    /// Returns the accepted products.
    #[inline]
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the accepted transactions.
    #[inline]
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Returns the total number of accepted records across all kinds.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.buyers.len() + self.products.len() + self.transactions.len()
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} buyers, {} products, {} transactions",
            self.date,
            self.buyers.len(),
            self.products.len(),
            self.transactions.len()
        )
    }
}

/// Result of asking the coordinator to load a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadOutcome {
    /// The date was fetched, staged, and committed.
    Loaded(LoadSummary),

    /// The date was already in the store; no feed was contacted.
    AlreadyLoaded {
        /// The date the gate closed on.
        date: LoadDate,
    },
}

impl LoadOutcome {
    /// Returns true if the idempotency gate closed the run.
    #[inline]
    #[must_use]
    pub const fn is_already_loaded(&self) -> bool {
        matches!(self, Self::AlreadyLoaded { .. })
    }

    /// Returns the date the run targeted.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> LoadDate {
        match self {
            Self::Loaded(summary) => summary.date(),
            Self::AlreadyLoaded { date } => *date,
        }
    }
}
