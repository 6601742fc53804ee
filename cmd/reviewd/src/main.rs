//! # reviewd
//!
//! The entry point: loads settings, constructs the two store adapters,
//! injects them into the aggregation service, and serves the HTTP API
//! until SIGINT/SIGTERM. Adapters are built here and passed down —
//! nothing reaches for a global handle.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api_adapters::{router, AppState};
use configs::Settings;
use services::ReviewService;
use storage_adapters::{PgReviewStore, RedisCounterStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("failed to load configuration")?;

    let review_store = Arc::new(
        PgReviewStore::connect(
            settings.postgres.url.expose_secret(),
            settings.postgres.max_connections,
        )
        .await
        .context("failed to initialize the review store")?,
    );
    let counter_store = Arc::new(
        RedisCounterStore::connect(settings.redis.url.expose_secret())
            .context("failed to initialize the counter store")?,
    );

    let service = Arc::new(ReviewService::new(review_store.clone(), counter_store));
    let app = router(AppState { reviews: service });

    let listener = TcpListener::bind(&settings.http.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.http.bind))?;
    info!(bind = %settings.http.bind, "reviewd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    review_store.close().await;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
