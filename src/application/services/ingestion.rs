//! # Ingestion Coordinator
//!
//! Orchestrates one load run: gate check, three concurrent pipelines, one
//! deferred commit.
//!
//! The [`IngestionService`] first probes the store for the requested date;
//! if any record already carries it the run ends as
//! [`LoadOutcome::AlreadyLoaded`] without touching the feeds. Otherwise it
//! opens one load transaction and spawns a pipeline per record kind, each
//! fetching, parsing, deduplicating, and staging its batch. The first
//! pipeline failure aborts the run and discards the transaction; only when
//! all three succeed is the transaction committed, so a date is stored
//! entirely or not at all.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::dedup::DedupFilter;
use crate::domain::entities::{Buyer, LoadOutcome, LoadSummary, Product, Transaction};
use crate::domain::value_objects::{EntityKind, LoadDate, LoadState};
use crate::infrastructure::feeds::{
    parse_buyers, parse_products, parse_transactions, FeedSource,
};
use crate::infrastructure::store::{GraphStore, LoadTransaction, Persister};

/// One pipeline's accepted batch.
#[derive(Debug)]
enum PipelineBatch {
    Buyers(Vec<Buyer>),
    Products(Vec<Product>),
    Transactions(Vec<Transaction>),
}

impl PipelineBatch {
    fn len(&self) -> usize {
        match self {
            Self::Buyers(records) => records.len(),
            Self::Products(records) => records.len(),
            Self::Transactions(records) => records.len(),
        }
    }
}

/// Coordinator for per-date load runs.
#[derive(Debug)]
pub struct IngestionService {
    feeds: Arc<dyn FeedSource>,
    store: Arc<dyn GraphStore>,
}

impl IngestionService {
    /// Creates a coordinator over the given feed source and store.
    #[must_use]
    pub fn new(feeds: Arc<dyn FeedSource>, store: Arc<dyn GraphStore>) -> Self {
        Self { feeds, store }
    }

    /// Loads all three record kinds for one date.
    ///
    /// Idempotent per date: a date the store already holds returns
    /// [`LoadOutcome::AlreadyLoaded`] without any feed request.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline failure (feed, parse, or store), or the
    /// commit failure. On any error the load transaction is discarded and
    /// nothing from this run becomes visible.
    pub async fn load_for_date(&self, date: &LoadDate) -> ApplicationResult<LoadOutcome> {
        let mut state = LoadState::Idle;
        info!(%date, "starting load run");

        let already = self.store.date_loaded(date).await?;
        advance(&mut state, LoadState::DateChecked);
        if already {
            advance(&mut state, LoadState::Aborted);
            info!(%date, "date already loaded, nothing to do");
            return Ok(LoadOutcome::AlreadyLoaded { date: *date });
        }

        let txn = self.store.begin_load();
        advance(&mut state, LoadState::Running);

        // Buffer sized to the pipeline count: every task can deliver its
        // result even after the coordinator stopped receiving.
        let (tx, mut rx) = mpsc::channel(EntityKind::COUNT);
        for kind in EntityKind::ALL {
            let feeds = Arc::clone(&self.feeds);
            let store = Arc::clone(&self.store);
            let persister = Persister::new(Arc::clone(&txn));
            let date = *date;
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = match kind {
                    EntityKind::Buyer => {
                        run_buyer_pipeline(feeds, store, persister, date).await
                    }
                    EntityKind::Product => {
                        run_product_pipeline(feeds, store, persister, date).await
                    }
                    EntityKind::Transaction => {
                        run_transaction_pipeline(feeds, persister, date).await
                    }
                };
                let _ = tx.send((kind, result)).await;
            });
        }
        drop(tx);

        let mut buyers = Vec::new();
        let mut products = Vec::new();
        let mut transactions = Vec::new();
        let mut pending: Vec<EntityKind> = EntityKind::ALL.to_vec();

        while !pending.is_empty() {
            match rx.recv().await {
                Some((kind, Ok(batch))) => {
                    pending.retain(|k| *k != kind);
                    debug!(%kind, records = batch.len(), "pipeline finished");
                    match batch {
                        PipelineBatch::Buyers(records) => buyers = records,
                        PipelineBatch::Products(records) => products = records,
                        PipelineBatch::Transactions(records) => transactions = records,
                    }
                }
                Some((kind, Err(pipeline_error))) => {
                    error!(%kind, error = %pipeline_error, "pipeline failed, aborting run");
                    advance(&mut state, LoadState::Aborted);
                    discard_quietly(&txn).await;
                    return Err(pipeline_error);
                }
                None => {
                    // A task dropped its sender without reporting: it
                    // panicked before reaching the send.
                    let kind = pending.first().copied().unwrap_or(EntityKind::Buyer);
                    error!(%kind, "pipeline ended without reporting, aborting run");
                    advance(&mut state, LoadState::Aborted);
                    discard_quietly(&txn).await;
                    return Err(ApplicationError::pipeline_failed(
                        kind,
                        "task ended without reporting a result",
                    ));
                }
            }
        }

        if let Err(commit_error) = txn.commit().await {
            error!(error = %commit_error, "commit failed, aborting run");
            advance(&mut state, LoadState::Aborted);
            discard_quietly(&txn).await;
            return Err(commit_error.into());
        }
        advance(&mut state, LoadState::Committed);

        let summary = LoadSummary::new(*date, buyers, products, transactions);
        info!(%summary, "load run committed");
        Ok(LoadOutcome::Loaded(summary))
    }
}

fn advance(state: &mut LoadState, next: LoadState) {
    if state.can_transition_to(next) {
        debug!(from = %state, to = %next, "load state advanced");
    } else {
        warn!(from = %state, to = %next, "irregular load state jump");
    }
    *state = next;
}

async fn discard_quietly(txn: &Arc<dyn LoadTransaction>) {
    if let Err(discard_error) = txn.discard().await {
        warn!(error = %discard_error, "failed to discard load transaction");
    }
}

async fn run_buyer_pipeline(
    feeds: Arc<dyn FeedSource>,
    store: Arc<dyn GraphStore>,
    persister: Persister,
    date: LoadDate,
) -> ApplicationResult<PipelineBatch> {
    let raw = feeds.fetch(EntityKind::Buyer, &date).await?;
    let parsed = parse_buyers(&raw, date)?;
    let known = store.known_ids(EntityKind::Buyer).await?;
    let outcome = DedupFilter::new(known).filter(parsed);
    debug!(
        kind = %EntityKind::Buyer,
        kept = outcome.kept.len(),
        dropped = outcome.dropped,
        "batch deduplicated"
    );
    persister.persist(&outcome.kept).await?;
    Ok(PipelineBatch::Buyers(outcome.kept))
}

async fn run_product_pipeline(
    feeds: Arc<dyn FeedSource>,
    store: Arc<dyn GraphStore>,
    persister: Persister,
    date: LoadDate,
) -> ApplicationResult<PipelineBatch> {
    let raw = feeds.fetch(EntityKind::Product, &date).await?;
    let parsed = parse_products(&raw, date)?;
    let known = store.known_ids(EntityKind::Product).await?;
    let outcome = DedupFilter::new(known).filter(parsed);
    debug!(
        kind = %EntityKind::Product,
        kept = outcome.kept.len(),
        dropped = outcome.dropped,
        "batch deduplicated"
    );
    persister.persist(&outcome.kept).await?;
    Ok(PipelineBatch::Products(outcome.kept))
}

/// Purchase records are stored as reported; no dedup pass.
async fn run_transaction_pipeline(
    feeds: Arc<dyn FeedSource>,
    persister: Persister,
    date: LoadDate,
) -> ApplicationResult<PipelineBatch> {
    let raw = feeds.fetch(EntityKind::Transaction, &date).await?;
    let records = parse_transactions(&raw, date);
    persister.persist(&records).await?;
    Ok(PipelineBatch::Transactions(records))
}
