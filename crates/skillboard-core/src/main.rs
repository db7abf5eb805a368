// Transform entry point.
//
// 1. Initialize tracing (stderr)
// 2. Load config
// 3. Load the three sources and compute best skills
// 4. Log merge diagnostics
// 5. Write the snapshot

use skillboard_core::config;
use skillboard_core::snapshot;
use skillboard_core::transform;

use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Best-skill transform starting");

    let config = config::load_config().context("failed to load configuration")?;

    let output = transform::run_from_paths(&config.data_paths)
        .context("failed to compute player summaries")?;
    let report = &output.report;

    info!("Merge diagnostics:");
    info!("  stats rows:          {}", report.stats_rows);
    info!("  averages rows:       {}", report.averages_rows);
    info!("  name rows:           {}", report.name_rows);
    info!("  dropped (no stats):  {}", report.dropped_no_stats);
    info!("  dropped (no avgs):   {}", report.dropped_no_averages);
    info!("  players exported:    {}", report.exported);
    info!("  with names:          {}", report.with_names);
    info!("  without names:       {}", report.without_names);
    if report.missing_raw_values > 0 {
        warn!(
            "{} players have a null raw_value for their best skill",
            report.missing_raw_values
        );
    }

    let snapshot_path = Path::new(&config.snapshot.path);
    snapshot::write_snapshot(snapshot_path, &output.players)
        .context("failed to write snapshot")?;
    info!(
        "Exported {} players to {}",
        output.players.len(),
        snapshot_path.display()
    );

    Ok(())
}

/// Initialize tracing to stderr, filtered by `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skillboard_core=info,skillboard_transform=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
