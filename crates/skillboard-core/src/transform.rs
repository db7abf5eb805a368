// The offline transform: source tables in, player summaries out.

use crate::config::DataPaths;
use crate::snapshot::PlayerSummary;
use crate::sources::{self, AveragesTable, NameTable, RawPlayerRecord, SourceError};
use crate::zscore::{round_to, standardize, RosterStats};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("no players left after {stage}")]
    EmptyRoster { stage: &'static str },
}

/// Row counts from a transform run, logged as merge diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub stats_rows: usize,
    pub averages_rows: usize,
    pub name_rows: usize,
    /// Players dropped because every z-score was absent.
    pub dropped_no_stats: usize,
    /// Players dropped by the inner join with the averages source.
    pub dropped_no_averages: usize,
    pub exported: usize,
    pub with_names: usize,
    pub without_names: usize,
    pub missing_raw_values: usize,
}

/// Players plus the diagnostics of the run that produced them.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub players: Vec<PlayerSummary>,
    pub report: TransformReport,
}

/// Load the three sources named in `paths` and run the transform.
pub fn run_from_paths(paths: &DataPaths) -> Result<TransformOutput, TransformError> {
    let stats = sources::load_stats(Path::new(&paths.stats))?;
    info!("Loaded {} stats rows from {}", stats.len(), paths.stats);
    let averages = sources::load_averages(Path::new(&paths.averages))?;
    info!(
        "Loaded {} averages rows ({} players) from {}",
        averages.rows,
        averages.len(),
        paths.averages
    );
    let names = sources::load_names(Path::new(&paths.names))?;
    info!(
        "Loaded {} name rows ({} IDs) from {}",
        names.rows,
        names.len(),
        paths.names
    );

    build_summaries(&stats, &averages, &names)
}

/// Compute every player's best skill and join in raw values and names.
///
/// Output order follows the stats source. Players missing from the averages
/// source are dropped; players missing from the name source keep a `None`
/// name.
pub fn build_summaries(
    stats: &[RawPlayerRecord],
    averages: &AveragesTable,
    names: &NameTable,
) -> Result<TransformOutput, TransformError> {
    let mut report = TransformReport {
        stats_rows: stats.len(),
        averages_rows: averages.rows,
        name_rows: names.rows,
        ..TransformReport::default()
    };

    if stats.is_empty() {
        return Err(TransformError::EmptyRoster {
            stage: "loading the stats source",
        });
    }

    let roster = RosterStats::from_records(stats);
    for (category, pool) in roster.categories.iter() {
        if roster.is_degenerate(category) {
            warn!("{} has no spread across the roster; every z-score is 0", category);
        } else {
            info!("{}: mean={:.4} stdev={:.4}", category, pool.mean, pool.stdev);
        }
    }

    let mut players = Vec::new();
    let mut scored = 0usize;
    for record in stats {
        let z = standardize(record, &roster);
        let Some((best_skill, best_z)) = z.best_skill() else {
            report.dropped_no_stats += 1;
            continue;
        };
        scored += 1;

        let Some((player_id, raw)) = averages.entry(&record.player_id) else {
            report.dropped_no_averages += 1;
            continue;
        };

        let raw_value = raw[best_skill];
        if raw_value.is_none() {
            report.missing_raw_values += 1;
            warn!("Player {} has no raw {} average; raw_value will be null", player_id, best_skill);
        }

        let name = names.get(&record.player_id).map(str::to_string);
        if name.is_some() {
            report.with_names += 1;
        } else {
            report.without_names += 1;
        }

        players.push(PlayerSummary {
            player_id: player_id.to_string(),
            name,
            best_skill,
            z_score: round_to(best_z, 3),
            raw_value,
        });
    }

    if scored == 0 {
        return Err(TransformError::EmptyRoster {
            stage: "dropping players with no stats",
        });
    }
    if players.is_empty() {
        return Err(TransformError::EmptyRoster {
            stage: "joining with the averages source",
        });
    }
    if report.dropped_no_averages > 0 {
        info!(
            "{} players had no averages row and were left out",
            report.dropped_no_averages
        );
    }

    report.exported = players.len();
    Ok(TransformOutput { players, report })
}
