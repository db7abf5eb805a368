// Query service entry point.
//
// 1. Initialize tracing (stdout)
// 2. Load config
// 3. Load the snapshot (empty on failure)
// 4. Serve until Ctrl-C

use skillboard_api::query::PlayerIndex;
use skillboard_api::ApiServer;
use skillboard_core::config;
use skillboard_core::snapshot;

use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Skills API starting");

    let config = config::load_config().context("failed to load configuration")?;

    let index = PlayerIndex::new(snapshot::load_or_empty(Path::new(&config.snapshot.path)));
    if index.is_empty() {
        warn!("No players loaded; run skillboard-transform to build the snapshot");
    }
    let server = ApiServer::new(index);

    server
        .serve(&config.server.bind_addr(), shutdown_signal())
        .await
        .context("server error")?;

    info!("Skills API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize tracing to stdout, filtered by `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("skillboard_api=info,skillboard_core=info,tower_http=info,warn")
        }))
        .with_writer(std::io::stdout)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
