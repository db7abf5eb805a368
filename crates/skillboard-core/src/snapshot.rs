// The exported snapshot: one PlayerSummary per player, as a JSON array.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// A player's best skill, as written to and served from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: String,
    pub name: Option<String>,
    pub best_skill: Category,
    /// Z-score of `best_skill`, rounded to three decimals.
    pub z_score: f64,
    /// Raw per-game average for `best_skill`; `None` when the averages source
    /// has no value for it.
    pub raw_value: Option<f64>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Serialize players as pretty JSON (two-space indent, trailing newline).
pub fn to_json(players: &[PlayerSummary]) -> Result<String, SnapshotError> {
    let mut text = serde_json::to_string_pretty(players).map_err(SnapshotError::Serialize)?;
    text.push('\n');
    Ok(text)
}

/// Write the snapshot to `path`, creating parent directories as needed.
pub fn write_snapshot(path: &Path, players: &[PlayerSummary]) -> Result<(), SnapshotError> {
    let text = to_json(players)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SnapshotError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, text).map_err(|e| SnapshotError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and parse a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<Vec<PlayerSummary>, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|e| SnapshotError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| SnapshotError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read the snapshot for service startup.
///
/// Never fails: a missing, unreadable, or malformed file is logged and an
/// empty collection is returned, so the service still boots and reports zero
/// players.
pub fn load_or_empty(path: &Path) -> Vec<PlayerSummary> {
    match read_snapshot(path) {
        Ok(players) => {
            info!("Loaded {} players from {}", players.len(), path.display());
            players
        }
        Err(SnapshotError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!("Snapshot {} not found; serving an empty roster", path.display());
            Vec::new()
        }
        Err(e) => {
            error!("{e}; serving an empty roster");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("skillboard_snapshot_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn lebron() -> PlayerSummary {
        PlayerSummary {
            player_id: "2544".into(),
            name: Some("LeBron James".into()),
            best_skill: Category::Assists,
            z_score: 2.417,
            raw_value: Some(8.3),
        }
    }

    #[test]
    fn json_has_exactly_five_fields() {
        let text = to_json(&[lebron()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let obj = value[0].as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["best_skill", "name", "player_id", "raw_value", "z_score"]);
        assert_eq!(obj["best_skill"], "AST");
        assert_eq!(obj["player_id"], "2544");
    }

    #[test]
    fn absent_name_and_raw_value_are_null() {
        let mut p = lebron();
        p.name = None;
        p.raw_value = None;
        let text = to_json(&[p]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value[0]["name"].is_null());
        assert!(value[0]["raw_value"].is_null());
    }

    #[test]
    fn json_is_indented_two_spaces() {
        let text = to_json(&[lebron()]).unwrap();
        assert!(text.starts_with("[\n  {\n    \"player_id\": \"2544\""));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn write_then_read_creates_parent_dirs() {
        let dir = scratch("write_read");
        let path = dir.join("nested").join("players.json");
        write_snapshot(&path, &[lebron()]).unwrap();
        let back = read_snapshot(&path).unwrap();
        assert_eq!(back, vec![lebron()]);
    }

    #[test]
    fn read_rejects_unknown_skill() {
        let dir = scratch("bad_skill");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players.json");
        std::fs::write(
            &path,
            r#"[{"player_id":"1","name":null,"best_skill":"MIN","z_score":1.0,"raw_value":null}]"#,
        )
        .unwrap();
        assert!(matches!(read_snapshot(&path), Err(SnapshotError::Parse { .. })));
    }

    #[test]
    fn load_or_empty_on_missing_file() {
        let dir = scratch("missing");
        assert!(load_or_empty(&dir.join("players.json")).is_empty());
    }

    #[test]
    fn load_or_empty_on_malformed_file() {
        let dir = scratch("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_or_empty(&path).is_empty());
    }
}
