// Library root for the best-skill transform: source loading, z-scores,
// and the snapshot format shared with the query service.

pub mod category;
pub mod config;
pub mod player_id;
pub mod snapshot;
pub mod sources;
pub mod transform;
pub mod zscore;
