//! # Store Ports
//!
//! Trait definitions for graph-store access.
//!
//! [`GraphStore`] is the read side plus the entry point for a load
//! transaction; [`LoadTransaction`] is the write side. A load run stages
//! any number of mutations and then either commits once or discards, so
//! partially ingested dates are never visible to readers.
//!
//! Implementations must be safe to share across tasks; the three ingestion
//! pipelines stage into one transaction concurrently.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{Buyer, Product, Transaction};
use crate::domain::value_objects::{BuyerId, EntityKind, LoadDate, ProductId};
use crate::infrastructure::store::error::StoreResult;
use crate::infrastructure::store::mutation::MutationPayload;

/// Read-side port for the graph store.
#[async_trait]
pub trait GraphStore: Send + Sync + fmt::Debug {
    /// Returns whether any record already carries the given load date.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe query fails.
    async fn date_loaded(&self, date: &LoadDate) -> StoreResult<bool>;

    /// Returns every stored id for one record kind.
    ///
    /// Feeds kind-level dedup: ids already present are dropped from
    /// incoming batches before staging.
    ///
    /// # Errors
    ///
    /// Returns an error if the id query fails.
    async fn known_ids(&self, kind: EntityKind) -> StoreResult<HashSet<String>>;

    /// Opens a new load transaction.
    fn begin_load(&self) -> Arc<dyn LoadTransaction>;

    /// Returns one page of buyers.
    ///
    /// `offset` is an absolute record offset, not a page number.
    ///
    /// # Errors
    ///
    /// Returns an error if the page query fails.
    async fn buyers_page(&self, offset: usize, limit: usize) -> StoreResult<Vec<Buyer>>;

    /// Returns the total number of stored buyers.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    async fn buyer_count(&self) -> StoreResult<usize>;

    /// Returns the name of one buyer, if stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn buyer_name(&self, id: &BuyerId) -> StoreResult<Option<String>>;

    /// Returns every transaction recorded for one buyer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn transactions_by_buyer(&self, id: &BuyerId) -> StoreResult<Vec<Transaction>>;

    /// Returns every transaction whose source address is in `ips`.
    ///
    /// An empty `ips` slice returns an empty list without querying.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn transactions_for_ips(&self, ips: &[String]) -> StoreResult<Vec<Transaction>>;

    /// Returns up to `limit` transactions containing any of the given
    /// product ids.
    ///
    /// An empty id slice returns an empty list without querying.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn transactions_with_any_product(
        &self,
        product_ids: &[ProductId],
        limit: usize,
    ) -> StoreResult<Vec<Transaction>>;

    /// Returns the buyers matching any of the given ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn buyers_by_ids(&self, ids: &[BuyerId]) -> StoreResult<Vec<Buyer>>;

    /// Returns the products matching any of the given ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn products_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>>;
}

/// Write-side port: one deferred-commit load transaction.
///
/// `stage` may be called from several tasks; implementations serialize
/// internally. After `commit` or `discard` the transaction is closed and
/// every further call fails.
#[async_trait]
pub trait LoadTransaction: Send + Sync + fmt::Debug {
    /// Stages one encoded mutation into the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the mutation or the
    /// transaction is already closed.
    async fn stage(&self, payload: MutationPayload) -> StoreResult<()>;

    /// Commits everything staged so far, making it durable and visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the transaction is already
    /// closed. Nothing staged becomes visible on failure.
    async fn commit(&self) -> StoreResult<()>;

    /// Discards the transaction; staged mutations are dropped.
    ///
    /// Idempotent: discarding a closed transaction is a no-op.
    ///
    /// # Errors
    ///
    /// Implementations raise errors only for local bookkeeping failures;
    /// best-effort store-side aborts are logged, not surfaced.
    async fn discard(&self) -> StoreResult<()>;
}
