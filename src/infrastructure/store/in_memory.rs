//! # In-Memory Store
//!
//! In-memory implementation of [`GraphStore`] for tests and local runs
//! without a graph database.
//!
//! Load transactions buffer the same encoded payloads the real store
//! receives and decode them at commit time, so the whole mutation
//! encoding path is exercised even in tests.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::{Buyer, Product, Transaction};
use crate::domain::value_objects::{BuyerId, EntityKind, LoadDate, ProductId};
use crate::infrastructure::store::error::{StoreError, StoreResult};
use crate::infrastructure::store::mutation::MutationPayload;
use crate::infrastructure::store::traits::{GraphStore, LoadTransaction};

#[derive(Debug, Default)]
struct StoreData {
    buyers: Vec<Buyer>,
    products: Vec<Product>,
    transactions: Vec<Transaction>,
}

impl StoreData {
    fn apply(&mut self, payload: &MutationPayload) -> StoreResult<()> {
        let nodes: Vec<serde_json::Value> = serde_json::from_str(payload.nodes_json())
            .map_err(|e| StoreError::decode(format!("staged payload shape: {e}")))?;
        for node in nodes {
            match payload.kind() {
                EntityKind::Buyer => self.buyers.push(
                    serde_json::from_value(node)
                        .map_err(|e| StoreError::decode(format!("staged buyer node: {e}")))?,
                ),
                EntityKind::Product => self.products.push(
                    serde_json::from_value(node)
                        .map_err(|e| StoreError::decode(format!("staged product node: {e}")))?,
                ),
                EntityKind::Transaction => self.transactions.push(
                    serde_json::from_value(node).map_err(|e| {
                        StoreError::decode(format!("staged transaction node: {e}"))
                    })?,
                ),
            }
        }
        Ok(())
    }
}

/// In-memory implementation of [`GraphStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every stored record.
    pub async fn clear(&self) {
        let mut data = self.data.write().await;
        data.buyers.clear();
        data.products.clear();
        data.transactions.clear();
    }
}

#[async_trait]
impl GraphStore for InMemoryStore {
    async fn date_loaded(&self, date: &LoadDate) -> StoreResult<bool> {
        let data = self.data.read().await;
        let loaded = data.buyers.iter().any(|b| b.date() == *date)
            || data.products.iter().any(|p| p.date() == *date)
            || data.transactions.iter().any(|t| t.date() == *date);
        Ok(loaded)
    }

    async fn known_ids(&self, kind: EntityKind) -> StoreResult<HashSet<String>> {
        let data = self.data.read().await;
        let ids = match kind {
            EntityKind::Buyer => data
                .buyers
                .iter()
                .map(|b| b.buyer_id().as_str().to_string())
                .collect(),
            EntityKind::Product => data
                .products
                .iter()
                .map(|p| p.product_id().as_str().to_string())
                .collect(),
            EntityKind::Transaction => data
                .transactions
                .iter()
                .map(|t| t.transaction_id().as_str().to_string())
                .collect(),
        };
        Ok(ids)
    }

    fn begin_load(&self) -> Arc<dyn LoadTransaction> {
        Arc::new(InMemoryLoadTransaction {
            data: Arc::clone(&self.data),
            buffer: Mutex::new(TxnBuffer::default()),
        })
    }

    async fn buyers_page(&self, offset: usize, limit: usize) -> StoreResult<Vec<Buyer>> {
        let data = self.data.read().await;
        Ok(data.buyers.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn buyer_count(&self) -> StoreResult<usize> {
        let data = self.data.read().await;
        Ok(data.buyers.len())
    }

    async fn buyer_name(&self, id: &BuyerId) -> StoreResult<Option<String>> {
        let data = self.data.read().await;
        Ok(data
            .buyers
            .iter()
            .find(|b| b.buyer_id() == id)
            .map(|b| b.name().to_string()))
    }

    async fn transactions_by_buyer(&self, id: &BuyerId) -> StoreResult<Vec<Transaction>> {
        let data = self.data.read().await;
        Ok(data
            .transactions
            .iter()
            .filter(|t| t.buyer_id() == id)
            .cloned()
            .collect())
    }

    async fn transactions_for_ips(&self, ips: &[String]) -> StoreResult<Vec<Transaction>> {
        if ips.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data.read().await;
        Ok(data
            .transactions
            .iter()
            .filter(|t| ips.iter().any(|ip| ip == t.ip()))
            .cloned()
            .collect())
    }

    async fn transactions_with_any_product(
        &self,
        product_ids: &[ProductId],
        limit: usize,
    ) -> StoreResult<Vec<Transaction>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data.read().await;
        Ok(data
            .transactions
            .iter()
            .filter(|t| product_ids.iter().any(|id| t.involves_product(id)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn buyers_by_ids(&self, ids: &[BuyerId]) -> StoreResult<Vec<Buyer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data.read().await;
        Ok(data
            .buyers
            .iter()
            .filter(|b| ids.contains(b.buyer_id()))
            .cloned()
            .collect())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data.read().await;
        Ok(data
            .products
            .iter()
            .filter(|p| ids.contains(p.product_id()))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct TxnBuffer {
    staged: Vec<MutationPayload>,
    closed: Option<&'static str>,
}

/// Buffered load transaction over an [`InMemoryStore`].
#[derive(Debug)]
struct InMemoryLoadTransaction {
    data: Arc<RwLock<StoreData>>,
    buffer: Mutex<TxnBuffer>,
}

#[async_trait]
impl LoadTransaction for InMemoryLoadTransaction {
    async fn stage(&self, payload: MutationPayload) -> StoreResult<()> {
        let mut buffer = self.buffer.lock().await;
        if let Some(terminal) = buffer.closed {
            return Err(StoreError::transaction_closed(terminal));
        }
        buffer.staged.push(payload);
        Ok(())
    }

    async fn commit(&self) -> StoreResult<()> {
        let mut buffer = self.buffer.lock().await;
        if let Some(terminal) = buffer.closed {
            return Err(StoreError::transaction_closed(terminal));
        }
        // Decode everything before touching the store, so a bad payload
        // leaves the data untouched.
        let mut incoming = StoreData::default();
        for payload in &buffer.staged {
            incoming.apply(payload)?;
        }
        let mut data = self.data.write().await;
        data.buyers.append(&mut incoming.buyers);
        data.products.append(&mut incoming.products);
        data.transactions.append(&mut incoming.transactions);
        buffer.closed = Some("committed");
        Ok(())
    }

    async fn discard(&self) -> StoreResult<()> {
        let mut buffer = self.buffer.lock().await;
        if buffer.closed.is_some() {
            return Ok(());
        }
        buffer.staged.clear();
        buffer.closed = Some("discarded");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TransactionId;
    use crate::infrastructure::store::mutation::Persister;
    use rust_decimal::Decimal;

    fn date() -> LoadDate {
        LoadDate::parse("2020-08-17").unwrap()
    }

    fn buyer(id: &str, name: &str) -> Buyer {
        Buyer::new(BuyerId::new(id), 30, name.to_string(), date())
    }

    fn product(id: &str, name: &str) -> Product {
        Product::new(
            ProductId::new(id),
            name.to_string(),
            Decimal::new(499, 0),
            date(),
        )
    }

    fn transaction(id: &str, buyer_id: &str, ip: &str, products: &[&str]) -> Transaction {
        Transaction::new(
            TransactionId::new(id),
            BuyerId::new(buyer_id),
            ip.to_string(),
            "android".to_string(),
            products.iter().map(|p| ProductId::new(*p)).collect(),
            date(),
        )
    }

    async fn seed(store: &InMemoryStore) {
        let txn = store.begin_load();
        let persister = Persister::new(txn.clone());
        persister
            .persist(&[buyer("b1", "Lucas"), buyer("b2", "Marta"), buyer("b3", "Iris")])
            .await
            .unwrap();
        persister
            .persist(&[product("p1", "Sauce"), product("p2", "Rice")])
            .await
            .unwrap();
        persister
            .persist(&[
                transaction("t1", "b1", "203.0.113.7", &["p1"]),
                transaction("t2", "b2", "203.0.113.7", &["p1", "p2"]),
                transaction("t3", "b3", "198.51.100.2", &["p2"]),
            ])
            .await
            .unwrap();
        txn.commit().await.unwrap();
    }

    mod transactions {
        use super::*;

        #[tokio::test]
        async fn nothing_visible_before_commit() {
            let store = InMemoryStore::new();
            let txn = store.begin_load();
            let persister = Persister::new(txn);
            persister.persist(&[buyer("b1", "Lucas")]).await.unwrap();

            assert!(!store.date_loaded(&date()).await.unwrap());
            assert_eq!(store.buyer_count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn commit_makes_staged_records_visible() {
            let store = InMemoryStore::new();
            seed(&store).await;

            assert!(store.date_loaded(&date()).await.unwrap());
            assert_eq!(store.buyer_count().await.unwrap(), 3);
            let product_ids = store.known_ids(EntityKind::Product).await.unwrap();
            assert!(product_ids.contains("p1"));
            assert!(product_ids.contains("p2"));
        }

        #[tokio::test]
        async fn discard_drops_staged_records() {
            let store = InMemoryStore::new();
            let txn = store.begin_load();
            let persister = Persister::new(txn.clone());
            persister.persist(&[buyer("b1", "Lucas")]).await.unwrap();

            txn.discard().await.unwrap();

            assert_eq!(store.buyer_count().await.unwrap(), 0);
            let err = txn.stage(
                crate::infrastructure::store::mutation::encode_batch(&[buyer("b2", "Marta")])
                    .unwrap(),
            );
            assert!(matches!(
                err.await.unwrap_err(),
                StoreError::TransactionClosed { state: "discarded" }
            ));
        }

        #[tokio::test]
        async fn commit_twice_is_rejected() {
            let store = InMemoryStore::new();
            let txn = store.begin_load();
            txn.commit().await.unwrap();

            let err = txn.commit().await.unwrap_err();
            assert!(matches!(
                err,
                StoreError::TransactionClosed { state: "committed" }
            ));
        }
    }

    mod reads {
        use super::*;

        #[tokio::test]
        async fn pages_buyers_in_store_order() {
            let store = InMemoryStore::new();
            seed(&store).await;

            let page = store.buyers_page(1, 2).await.unwrap();
            assert_eq!(page.len(), 2);
            assert_eq!(page[0].buyer_id().as_str(), "b2");
            assert_eq!(page[1].buyer_id().as_str(), "b3");

            let past_end = store.buyers_page(10, 5).await.unwrap();
            assert!(past_end.is_empty());
        }

        #[tokio::test]
        async fn finds_buyer_name() {
            let store = InMemoryStore::new();
            seed(&store).await;

            let name = store.buyer_name(&BuyerId::new("b2")).await.unwrap();
            assert_eq!(name.as_deref(), Some("Marta"));
            assert!(store
                .buyer_name(&BuyerId::new("missing"))
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test]
        async fn filters_transactions_by_buyer_and_ip() {
            let store = InMemoryStore::new();
            seed(&store).await;

            let for_b1 = store
                .transactions_by_buyer(&BuyerId::new("b1"))
                .await
                .unwrap();
            assert_eq!(for_b1.len(), 1);
            assert_eq!(for_b1[0].transaction_id().as_str(), "t1");

            let shared_ip = store
                .transactions_for_ips(&["203.0.113.7".to_string()])
                .await
                .unwrap();
            assert_eq!(shared_ip.len(), 2);
        }

        #[tokio::test]
        async fn product_search_respects_limit_and_order() {
            let store = InMemoryStore::new();
            seed(&store).await;

            let hits = store
                .transactions_with_any_product(&[ProductId::new("p1"), ProductId::new("p2")], 2)
                .await
                .unwrap();
            assert_eq!(hits.len(), 2);
            assert_eq!(hits[0].transaction_id().as_str(), "t1");
            assert_eq!(hits[1].transaction_id().as_str(), "t2");
        }

        #[tokio::test]
        async fn resolves_records_by_id_sets() {
            let store = InMemoryStore::new();
            seed(&store).await;

            let buyers = store
                .buyers_by_ids(&[BuyerId::new("b1"), BuyerId::new("b3")])
                .await
                .unwrap();
            assert_eq!(buyers.len(), 2);

            let products = store.products_by_ids(&[ProductId::new("p2")]).await.unwrap();
            assert_eq!(products.len(), 1);
            assert_eq!(products[0].name(), "Rice");
        }
    }
}
