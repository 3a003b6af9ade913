//! # Co-Purchase Recommendations
//!
//! Mines product suggestions for a buyer from overlapping purchases.
//!
//! The [`RecommendationService`] gathers everything the buyer has bought,
//! probes a bounded number of other transactions containing any of those
//! products, and offers a random sample of the products those transactions
//! add. Products the buyer already owns never appear, and neither do
//! duplicates. A buyer with no purchase history gets an empty list without
//! any co-purchase probe.
//!
//! Selection is intentionally non-deterministic: every call shuffles the
//! candidate pool with a fresh RNG, so repeated requests rotate through
//! the candidates.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::application::error::ApplicationResult;
use crate::domain::entities::Product;
use crate::domain::value_objects::{BuyerId, ProductId};
use crate::infrastructure::store::GraphStore;

/// Configuration for recommendation mining.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Maximum number of products to suggest.
    pub max_recommendations: usize,
    /// Maximum number of co-purchase transactions to inspect.
    pub max_co_transactions: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 10,
            max_co_transactions: 10,
        }
    }
}

impl RecommendationConfig {
    /// Sets the maximum number of suggested products.
    #[must_use]
    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    /// Sets the maximum number of co-purchase transactions inspected.
    #[must_use]
    pub fn with_max_co_transactions(mut self, max: usize) -> Self {
        self.max_co_transactions = max;
        self
    }
}

/// Service mining co-purchase recommendations from the store.
#[derive(Debug)]
pub struct RecommendationService {
    store: Arc<dyn GraphStore>,
    config: RecommendationConfig,
}

impl RecommendationService {
    /// Creates a service with the given configuration.
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>, config: RecommendationConfig) -> Self {
        Self { store, config }
    }

    /// Creates a service with default bounds.
    #[must_use]
    pub fn with_defaults(store: Arc<dyn GraphStore>) -> Self {
        Self::new(store, RecommendationConfig::default())
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Suggests up to the configured number of products for one buyer.
    ///
    /// # Errors
    ///
    /// Returns an error if any store query fails; no partial list is
    /// returned.
    pub async fn recommendations_for(
        &self,
        buyer_id: &BuyerId,
    ) -> ApplicationResult<Vec<Product>> {
        let own_transactions = self.store.transactions_by_buyer(buyer_id).await?;

        let mut bought: Vec<ProductId> = Vec::new();
        let mut seen: HashSet<ProductId> = HashSet::new();
        for transaction in &own_transactions {
            for product_id in transaction.products() {
                if seen.insert(product_id.clone()) {
                    bought.push(product_id.clone());
                }
            }
        }
        if bought.is_empty() {
            debug!(%buyer_id, "no purchase history, nothing to recommend");
            return Ok(Vec::new());
        }

        let co_transactions = self
            .store
            .transactions_with_any_product(&bought, self.config.max_co_transactions)
            .await?;

        // First appearance wins; products the buyer owns are never
        // candidates.
        let mut candidates: Vec<ProductId> = Vec::new();
        for transaction in &co_transactions {
            for product_id in transaction.products() {
                if seen.insert(product_id.clone()) {
                    candidates.push(product_id.clone());
                }
            }
        }
        if candidates.is_empty() {
            debug!(%buyer_id, "no unseen co-purchased products");
            return Ok(Vec::new());
        }

        let mut pool = self.store.products_by_ids(&candidates).await?;
        pool.shuffle(&mut rand::rng());

        let mut picked: Vec<Product> = Vec::new();
        let mut picked_ids: HashSet<ProductId> = HashSet::new();
        for product in pool {
            if picked.len() == self.config.max_recommendations {
                break;
            }
            if picked_ids.insert(product.product_id().clone()) {
                picked.push(product);
            }
        }

        debug!(
            %buyer_id,
            candidates = candidates.len(),
            suggested = picked.len(),
            "recommendations mined"
        );
        Ok(picked)
    }
}
