//! # Read Models
//!
//! Derived views over the synced records for the HTTP surface.
//!
//! The buyer listing pages at the store (offset/limit in the query); the
//! buyer detail view fetches the subject's full history once and slices
//! its sections in memory. All slicing is clamp-safe: out-of-range pages
//! come back empty, never as an error.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::application::error::ApplicationResult;
use crate::application::services::recommendation::RecommendationService;
use crate::domain::entities::{Buyer, Product, Transaction};
use crate::domain::value_objects::{BuyerId, ProductId};
use crate::infrastructure::store::GraphStore;

/// One page of the buyer listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuyerCollection {
    /// Buyers on this page, in store order.
    pub buyers: Vec<Buyer>,
    /// Requested page (0-based).
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Total buyers in the store.
    pub total: usize,
}

/// Paged purchase history of one buyer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionHistory {
    /// Transactions on this page.
    pub transactions: Vec<Transaction>,
    /// Requested page (1-based).
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Total transactions for the buyer.
    pub total: usize,
}

/// Paged buyers sharing a source address with the subject.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SameIpBuyers {
    /// Buyers on this page; the subject is never included.
    pub buyers: Vec<Buyer>,
    /// Requested page (1-based).
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Total distinct co-located buyers.
    pub total: usize,
}

/// Aggregated detail view for one buyer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuyerDetailView {
    /// Subject buyer id.
    pub buyer_id: BuyerId,
    /// Subject name; empty when the buyer is unknown.
    pub name: String,
    /// The subject's purchase history.
    pub transaction_history: TransactionHistory,
    /// Buyers who transacted from the subject's addresses.
    pub buyers_with_same_ip: SameIpBuyers,
    /// Mined product suggestions.
    pub recommended_products: Vec<Product>,
}

/// Page selection for the two in-memory sections of the detail view.
#[derive(Debug, Clone, Copy)]
pub struct DetailPageParams {
    /// 1-based page of the co-located buyers section.
    pub buyers_page: usize,
    /// Page size of the co-located buyers section.
    pub buyers_page_size: usize,
    /// 1-based page of the transaction history section.
    pub transactions_page: usize,
    /// Page size of the transaction history section.
    pub transactions_page_size: usize,
}

impl Default for DetailPageParams {
    fn default() -> Self {
        Self {
            buyers_page: 1,
            buyers_page_size: 10,
            transactions_page: 1,
            transactions_page_size: 10,
        }
    }
}

/// Clamp-safe 1-based page slice.
fn slice_page<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    items.iter().skip(start).take(page_size).cloned().collect()
}

/// Read-model service over the graph store.
#[derive(Debug)]
pub struct ViewService {
    store: Arc<dyn GraphStore>,
    recommender: Arc<RecommendationService>,
}

impl ViewService {
    /// Creates a view service.
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>, recommender: Arc<RecommendationService>) -> Self {
        Self { store, recommender }
    }

    /// Returns one page of the buyer listing with the total count.
    ///
    /// `page` is 0-based; the store skips `page * page_size` records.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails.
    pub async fn buyers_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> ApplicationResult<BuyerCollection> {
        let offset = page.saturating_mul(page_size);
        let buyers = self.store.buyers_page(offset, page_size).await?;
        let total = self.store.buyer_count().await?;
        Ok(BuyerCollection {
            buyers,
            page,
            page_size,
            total,
        })
    }

    /// Builds the aggregated detail view for one buyer.
    ///
    /// Unknown buyers produce an empty view (blank name, empty sections)
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query or the recommendation probe
    /// fails.
    pub async fn buyer_detail(
        &self,
        buyer_id: &BuyerId,
        params: DetailPageParams,
    ) -> ApplicationResult<BuyerDetailView> {
        let name = self.store.buyer_name(buyer_id).await?.unwrap_or_default();
        let own_transactions = self.store.transactions_by_buyer(buyer_id).await?;

        let mut ips: Vec<String> = Vec::new();
        let mut seen_ips: HashSet<&str> = HashSet::new();
        for transaction in &own_transactions {
            if seen_ips.insert(transaction.ip()) {
                ips.push(transaction.ip().to_string());
            }
        }

        let related = self.store.transactions_for_ips(&ips).await?;
        let mut related_ids: Vec<BuyerId> = Vec::new();
        let mut seen_buyers: HashSet<&BuyerId> = HashSet::new();
        for transaction in &related {
            let id = transaction.buyer_id();
            if id != buyer_id && seen_buyers.insert(id) {
                related_ids.push(id.clone());
            }
        }
        let co_located = self.store.buyers_by_ids(&related_ids).await?;

        let recommended_products = self.recommender.recommendations_for(buyer_id).await?;

        debug!(
            %buyer_id,
            transactions = own_transactions.len(),
            co_located = co_located.len(),
            recommended = recommended_products.len(),
            "buyer detail assembled"
        );

        Ok(BuyerDetailView {
            buyer_id: buyer_id.clone(),
            name,
            transaction_history: TransactionHistory {
                transactions: slice_page(
                    &own_transactions,
                    params.transactions_page,
                    params.transactions_page_size,
                ),
                page: params.transactions_page,
                page_size: params.transactions_page_size,
                total: own_transactions.len(),
            },
            buyers_with_same_ip: SameIpBuyers {
                buyers: slice_page(&co_located, params.buyers_page, params.buyers_page_size),
                page: params.buyers_page,
                page_size: params.buyers_page_size,
                total: co_located.len(),
            },
            recommended_products,
        })
    }

    /// Resolves products for display.
    ///
    /// Unknown ids are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn products_by_ids(&self, ids: &[ProductId]) -> ApplicationResult<Vec<Product>> {
        Ok(self.store.products_by_ids(ids).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{LoadDate, TransactionId};
    use crate::infrastructure::store::{InMemoryStore, Persister};
    use rust_decimal::Decimal;

    fn date() -> LoadDate {
        LoadDate::parse("2020-08-17").unwrap()
    }

    fn buyer(id: &str, name: &str) -> Buyer {
        Buyer::new(BuyerId::new(id), 30, name, date())
    }

    fn product(id: &str) -> Product {
        Product::new(ProductId::new(id), format!("Item {id}"), Decimal::new(9, 0), date())
    }

    fn transaction(id: &str, buyer: &str, ip: &str, products: &[&str]) -> Transaction {
        Transaction::new(
            TransactionId::new(id),
            BuyerId::new(buyer),
            ip,
            "android",
            products.iter().map(|p| ProductId::new(*p)).collect(),
            date(),
        )
    }

    async fn seed(store: &InMemoryStore) {
        let txn = store.begin_load();
        let persister = Persister::new(txn.clone());
        persister
            .persist(&[
                buyer("b1", "Lucas"),
                buyer("b2", "Marta"),
                buyer("b3", "Iris"),
                buyer("b4", "Hugo"),
                buyer("b5", "Vera"),
            ])
            .await
            .unwrap();
        persister
            .persist(&[product("p1"), product("p2"), product("p3")])
            .await
            .unwrap();
        persister
            .persist(&[
                transaction("t1", "b1", "203.0.113.7", &["p1"]),
                transaction("t2", "b1", "203.0.113.8", &["p2"]),
                transaction("t3", "b2", "203.0.113.7", &["p1", "p3"]),
                transaction("t4", "b3", "203.0.113.8", &["p2"]),
                transaction("t5", "b2", "203.0.113.7", &["p1"]),
                transaction("t6", "b4", "198.51.100.9", &["p3"]),
            ])
            .await
            .unwrap();
        txn.commit().await.unwrap();
    }

    fn view_service(store: InMemoryStore) -> ViewService {
        let store: Arc<dyn GraphStore> = Arc::new(store);
        let recommender = Arc::new(RecommendationService::with_defaults(Arc::clone(&store)));
        ViewService::new(store, recommender)
    }

    mod listing {
        use super::*;

        #[tokio::test]
        async fn pages_at_the_store_with_total() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let collection = svc.buyers_page(1, 2).await.unwrap();
            assert_eq!(collection.total, 5);
            assert_eq!(collection.buyers.len(), 2);
            assert_eq!(collection.buyers[0].buyer_id().as_str(), "b3");
            assert_eq!(collection.buyers[1].buyer_id().as_str(), "b4");
        }

        #[tokio::test]
        async fn past_the_end_is_empty() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let collection = svc.buyers_page(9, 10).await.unwrap();
            assert!(collection.buyers.is_empty());
            assert_eq!(collection.total, 5);
        }
    }

    mod detail {
        use super::*;

        #[tokio::test]
        async fn assembles_history_co_located_buyers_and_suggestions() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let view = svc
                .buyer_detail(&BuyerId::new("b1"), DetailPageParams::default())
                .await
                .unwrap();

            assert_eq!(view.name, "Lucas");
            assert_eq!(view.transaction_history.total, 2);
            assert_eq!(view.transaction_history.transactions.len(), 2);

            // b2 and b3 share b1's addresses; b1 itself never appears,
            // and b2's two transactions list it once.
            let co_ids: Vec<&str> = view
                .buyers_with_same_ip
                .buyers
                .iter()
                .map(|b| b.buyer_id().as_str())
                .collect();
            assert_eq!(co_ids, vec!["b2", "b3"]);
            assert_eq!(view.buyers_with_same_ip.total, 2);

            // b1 owns p1 and p2; p3 rides along in t3.
            let suggested: Vec<&str> = view
                .recommended_products
                .iter()
                .map(|p| p.product_id().as_str())
                .collect();
            assert_eq!(suggested, vec!["p3"]);
        }

        #[tokio::test]
        async fn slices_sections_per_request() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let params = DetailPageParams {
                transactions_page: 2,
                transactions_page_size: 1,
                ..DetailPageParams::default()
            };
            let view = svc.buyer_detail(&BuyerId::new("b1"), params).await.unwrap();

            assert_eq!(view.transaction_history.transactions.len(), 1);
            assert_eq!(
                view.transaction_history.transactions[0]
                    .transaction_id()
                    .as_str(),
                "t2"
            );
            assert_eq!(view.transaction_history.total, 2);
        }

        #[tokio::test]
        async fn out_of_range_pages_come_back_empty() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let params = DetailPageParams {
                transactions_page: 99,
                buyers_page: 50,
                ..DetailPageParams::default()
            };
            let view = svc.buyer_detail(&BuyerId::new("b1"), params).await.unwrap();

            assert!(view.transaction_history.transactions.is_empty());
            assert!(view.buyers_with_same_ip.buyers.is_empty());
            assert_eq!(view.transaction_history.total, 2);
        }

        #[tokio::test]
        async fn unknown_buyer_gets_an_empty_view() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let view = svc
                .buyer_detail(&BuyerId::new("nobody"), DetailPageParams::default())
                .await
                .unwrap();

            assert!(view.name.is_empty());
            assert_eq!(view.transaction_history.total, 0);
            assert_eq!(view.buyers_with_same_ip.total, 0);
            assert!(view.recommended_products.is_empty());
        }
    }

    mod products {
        use super::*;

        #[tokio::test]
        async fn resolves_known_ids_and_skips_unknown() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let found = svc
                .products_by_ids(&[ProductId::new("p1"), ProductId::new("missing")])
                .await
                .unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].product_id().as_str(), "p1");
        }
    }

    mod serialization {
        use super::*;

        #[tokio::test]
        async fn detail_view_uses_store_field_names() {
            let store = InMemoryStore::new();
            seed(&store).await;
            let svc = view_service(store);

            let view = svc
                .buyer_detail(&BuyerId::new("b1"), DetailPageParams::default())
                .await
                .unwrap();
            let json = serde_json::to_value(&view).unwrap();

            assert_eq!(json["BuyerId"], "b1");
            assert_eq!(json["Name"], "Lucas");
            assert!(json["TransactionHistory"]["Transactions"].is_array());
            assert!(json["BuyersWithSameIp"]["Total"].is_number());
            assert!(json["RecommendedProducts"].is_array());
        }
    }
}
