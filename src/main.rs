//! Service binary: wires configuration, adapters, and the REST server.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use restaurant_sync::api::rest::{create_router, AppState};
use restaurant_sync::application::services::{
    IngestionService, RecommendationConfig, RecommendationService, ViewService,
};
use restaurant_sync::config::AppConfig;
use restaurant_sync::infrastructure::feeds::FeedClient;
use restaurant_sync::infrastructure::store::{DgraphStore, GraphStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&cfg);

    let feeds = Arc::new(
        FeedClient::new(&cfg.feeds.base_url, cfg.feeds.timeout_ms)
            .context("failed to build feed client")?,
    );
    let store: Arc<dyn GraphStore> = Arc::new(
        DgraphStore::new(&cfg.store.base_url, cfg.store.timeout_ms)
            .context("failed to build graph store client")?,
    );

    let ingestion = Arc::new(IngestionService::new(feeds, Arc::clone(&store)));
    let recommender = Arc::new(RecommendationService::new(
        Arc::clone(&store),
        RecommendationConfig::default()
            .with_max_recommendations(cfg.recommendations.max_recommendations)
            .with_max_co_transactions(cfg.recommendations.max_co_transactions),
    ));
    let views = Arc::new(ViewService::new(Arc::clone(&store), recommender));

    let router = create_router(Arc::new(AppState { ingestion, views }));

    let bind = cfg.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(
        address = %bind,
        feeds = %cfg.feeds.base_url,
        store = %cfg.store.base_url,
        "restaurant sync service listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with an error")?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cfg.log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for the shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
