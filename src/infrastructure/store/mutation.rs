//! # Mutation Encoding
//!
//! Builds graph-store mutation payloads from domain records.
//!
//! Each batch becomes one JSON array of nodes. Every node carries the
//! store-side type tag (`dgraph.type`) for its record kind so typed
//! queries can find it later. Serialized text is scrubbed of escaped NUL
//! sequences; upstream feeds are known to leak NUL bytes into field text
//! and the store rejects them inside string predicates.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::entities::Product;
//! use restaurant_sync::domain::value_objects::{LoadDate, ProductId};
//! use restaurant_sync::infrastructure::store::encode_batch;
//! use rust_decimal::Decimal;
//!
//! let date = LoadDate::parse("2020-08-17")?;
//! let batch = vec![Product::new(
//!     ProductId::new("50d2"),
//!     "Sauce".to_string(),
//!     Decimal::new(499, 0),
//!     date,
//! )];
//! let payload = encode_batch(&batch)?;
//! assert_eq!(payload.record_count(), 1);
//! assert!(payload.nodes_json().contains("\"dgraph.type\":\"Product\""));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::entities::{Buyer, Product, Transaction};
use crate::domain::value_objects::EntityKind;
use crate::infrastructure::store::error::{StoreError, StoreResult};
use crate::infrastructure::store::traits::LoadTransaction;

/// Predicate used by the store to tag a node with its type.
pub const TYPE_PREDICATE: &str = "dgraph.type";

/// Escape sequence for a NUL byte in serialized JSON.
const NUL_ESCAPE: &str = "\\u0000";

/// A domain record that can be staged into the graph store.
pub trait GraphRecord: Serialize {
    /// Record kind this type is stored as.
    const KIND: EntityKind;
}

impl GraphRecord for Buyer {
    const KIND: EntityKind = EntityKind::Buyer;
}

impl GraphRecord for Product {
    const KIND: EntityKind = EntityKind::Product;
}

impl GraphRecord for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;
}

/// One encoded mutation: a JSON node array ready to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationPayload {
    kind: EntityKind,
    nodes_json: String,
    record_count: usize,
}

impl MutationPayload {
    // ========== Accessors ==========

    /// Record kind the payload carries.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Serialized JSON array of typed nodes.
    #[inline]
    #[must_use]
    pub fn nodes_json(&self) -> &str {
        &self.nodes_json
    }

    /// Number of records in the payload.
    #[inline]
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.record_count
    }
}

/// Encodes one batch of records into a mutation payload.
///
/// # Errors
///
/// Returns [`StoreError::Mutation`] if a record fails to serialize.
pub fn encode_batch<R: GraphRecord>(batch: &[R]) -> StoreResult<MutationPayload> {
    let mut nodes = Vec::with_capacity(batch.len());
    for record in batch {
        let mut node = serde_json::to_value(record)
            .map_err(|e| StoreError::mutation(format!("encoding {} node: {e}", R::KIND)))?;
        if let Value::Object(fields) = &mut node {
            fields.insert(
                TYPE_PREDICATE.to_string(),
                Value::String(R::KIND.type_tag().to_string()),
            );
        }
        nodes.push(node);
    }
    let serialized = serde_json::to_string(&nodes)
        .map_err(|e| StoreError::mutation(format!("encoding {} batch: {e}", R::KIND)))?;
    Ok(MutationPayload {
        kind: R::KIND,
        nodes_json: serialized.replace(NUL_ESCAPE, ""),
        record_count: batch.len(),
    })
}

/// Stages record batches into a load transaction.
#[derive(Debug, Clone)]
pub struct Persister {
    txn: Arc<dyn LoadTransaction>,
}

impl Persister {
    /// Creates a persister writing into the given transaction.
    #[must_use]
    pub fn new(txn: Arc<dyn LoadTransaction>) -> Self {
        Self { txn }
    }

    /// Encodes and stages one batch. Empty batches stage nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the store rejects the
    /// mutation.
    pub async fn persist<R: GraphRecord>(&self, batch: &[R]) -> StoreResult<()> {
        if batch.is_empty() {
            debug!(kind = %R::KIND, "empty batch, nothing to stage");
            return Ok(());
        }
        let payload = encode_batch(batch)?;
        debug!(
            kind = %payload.kind(),
            records = payload.record_count(),
            "staging batch"
        );
        self.txn.stage(payload).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{BuyerId, LoadDate, ProductId, TransactionId};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn date() -> LoadDate {
        LoadDate::parse("2020-08-17").unwrap()
    }

    #[derive(Debug, Default)]
    struct RecordingTxn {
        staged: Mutex<Vec<MutationPayload>>,
    }

    #[async_trait]
    impl LoadTransaction for RecordingTxn {
        async fn stage(&self, payload: MutationPayload) -> StoreResult<()> {
            self.staged.lock().unwrap().push(payload);
            Ok(())
        }

        async fn commit(&self) -> StoreResult<()> {
            Ok(())
        }

        async fn discard(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    mod encoding {
        use super::*;

        #[test]
        fn tags_every_node_with_its_kind() {
            let batch = vec![
                Buyer::new(BuyerId::new("ab12"), 30, "Lucas".to_string(), date()),
                Buyer::new(BuyerId::new("cd34"), 41, "Marta".to_string(), date()),
            ];
            let payload = encode_batch(&batch).unwrap();

            let nodes: Vec<Value> = serde_json::from_str(payload.nodes_json()).unwrap();
            assert_eq!(nodes.len(), 2);
            for node in &nodes {
                assert_eq!(node["dgraph.type"], "Buyer");
            }
            assert_eq!(nodes[0]["BuyerId"], "ab12");
            assert_eq!(nodes[0]["Date"], "2020-08-17");
        }

        #[test]
        fn prices_encode_as_strings() {
            let batch = vec![Product::new(
                ProductId::new("50d2"),
                "Sauce".to_string(),
                Decimal::new(8841, 0),
                date(),
            )];
            let payload = encode_batch(&batch).unwrap();

            let nodes: Vec<Value> = serde_json::from_str(payload.nodes_json()).unwrap();
            assert_eq!(nodes[0]["Price"], "8841");
        }

        #[test]
        fn strips_escaped_nul_sequences() {
            let batch = vec![Product::new(
                ProductId::new("x1"),
                "bad\u{0}name".to_string(),
                Decimal::new(5, 0),
                date(),
            )];
            let payload = encode_batch(&batch).unwrap();

            assert!(!payload.nodes_json().contains("\\u0000"));
            let nodes: Vec<Value> = serde_json::from_str(payload.nodes_json()).unwrap();
            assert_eq!(nodes[0]["Name"], "badname");
        }

        #[test]
        fn transaction_products_encode_as_id_list() {
            let batch = vec![Transaction::new(
                TransactionId::new("tx1"),
                BuyerId::new("b1"),
                "203.0.113.7".to_string(),
                "android".to_string(),
                vec![ProductId::new("p1"), ProductId::new("p2")],
                date(),
            )];
            let payload = encode_batch(&batch).unwrap();

            let nodes: Vec<Value> = serde_json::from_str(payload.nodes_json()).unwrap();
            assert_eq!(nodes[0]["dgraph.type"], "Transaction");
            assert_eq!(nodes[0]["Products"][0], "p1");
            assert_eq!(nodes[0]["Products"][1], "p2");
        }

        #[test]
        fn counts_records() {
            let batch = vec![
                Buyer::new(BuyerId::new("a"), 1, "A".to_string(), date()),
                Buyer::new(BuyerId::new("b"), 2, "B".to_string(), date()),
                Buyer::new(BuyerId::new("c"), 3, "C".to_string(), date()),
            ];
            let payload = encode_batch(&batch).unwrap();
            assert_eq!(payload.record_count(), 3);
            assert_eq!(payload.kind(), EntityKind::Buyer);
        }
    }

    mod persister {
        use super::*;

        #[tokio::test]
        async fn stages_non_empty_batches() {
            let txn = Arc::new(RecordingTxn::default());
            let persister = Persister::new(Arc::clone(&txn) as Arc<dyn LoadTransaction>);

            let batch = vec![Buyer::new(
                BuyerId::new("ab12"),
                30,
                "Lucas".to_string(),
                date(),
            )];
            persister.persist(&batch).await.unwrap();

            let staged = txn.staged.lock().unwrap();
            assert_eq!(staged.len(), 1);
            assert_eq!(staged[0].kind(), EntityKind::Buyer);
            assert_eq!(staged[0].record_count(), 1);
        }

        #[tokio::test]
        async fn empty_batch_stages_nothing() {
            let txn = Arc::new(RecordingTxn::default());
            let persister = Persister::new(Arc::clone(&txn) as Arc<dyn LoadTransaction>);

            persister.persist(&Vec::<Product>::new()).await.unwrap();

            assert!(txn.staged.lock().unwrap().is_empty());
        }
    }
}
