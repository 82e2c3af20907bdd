//! urlinfo server entry point.
//!
//! Boots the HTTP lookup endpoint against the configured verdict database.
//! Logs are emitted as JSON on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use urlinfo_core::{AppConfig, LookupService, VerdictDb};

mod handler;
mod url_info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let db_path = config.require_db_path()?;

    let db = VerdictDb::open(db_path, &config.table)
        .await
        .with_context(|| format!("opening verdict database {}", db_path.display()))?;
    let lookup = LookupService::new(Arc::new(db));

    let app = handler::router(lookup, &config.prefix);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, prefix = %config.prefix, table = %config.table, "Starting urlinfo server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
