// Read-only queries over the loaded snapshot.
//
// Every operation is a pure function of the player list and its arguments.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use skillboard_core::category::Category;
use skillboard_core::snapshot::PlayerSummary;
use skillboard_core::zscore::round_to;
use thiserror::Error;

/// Page size when `/players` gets no `limit`.
pub const DEFAULT_LIST_LIMIT: i64 = 50;
/// Largest page `/players` will return.
pub const MAX_LIST_LIMIT: i64 = 100;
/// Result count when `/top/{skill}` gets no `limit`.
pub const DEFAULT_TOP_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("No players found matching '{0}'")]
    NameNotFound(String),

    #[error("Player ID '{0}' not found")]
    IdNotFound(String),

    #[error("No players found with '{0}' as their best skill")]
    SkillNotFound(String),
}

/// Query-string parameters for the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub skill: Option<String>,
}

/// One page of the (optionally skill-filtered) roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// Size of the filtered collection, before slicing.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub skill: Option<String>,
    pub data: Vec<&'a PlayerSummary>,
}

/// How many players have a given best skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillCount {
    #[serde(skip)]
    pub skill: Category,
    pub count: usize,
    pub percentage: f64,
}

/// Best-skill distribution, most common first.
///
/// Serializes as a JSON object keyed by category code, preserving order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillBreakdown(pub Vec<SkillCount>);

impl Serialize for SkillBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(entry.skill.code(), entry)?;
        }
        map.end()
    }
}

/// The immutable in-memory player collection.
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    players: Vec<PlayerSummary>,
}

impl PlayerIndex {
    pub fn new(players: Vec<PlayerSummary>) -> Self {
        PlayerIndex { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Case-insensitive substring match on player names.
    ///
    /// Players without a name never match.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<&PlayerSummary>, QueryError> {
        let needle = query.to_lowercase();
        let matches: Vec<&PlayerSummary> = self
            .players
            .iter()
            .filter(|p| {
                p.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect();
        if matches.is_empty() {
            return Err(QueryError::NameNotFound(query.to_string()));
        }
        Ok(matches)
    }

    /// Exact match on `player_id`.
    pub fn get_by_id(&self, player_id: &str) -> Result<&PlayerSummary, QueryError> {
        self.players
            .iter()
            .find(|p| p.player_id == player_id)
            .ok_or_else(|| QueryError::IdNotFound(player_id.to_string()))
    }

    /// One page of players, optionally filtered to a best skill.
    ///
    /// `limit` is clamped to `0..=100` and `offset` to `>= 0`; an offset past
    /// the end yields an empty page.
    pub fn list(&self, params: &ListParams) -> Page<'_> {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(0, MAX_LIST_LIMIT) as usize;
        let offset = params.offset.unwrap_or(0).max(0) as usize;
        let skill = params.skill.clone().filter(|s| !s.is_empty());

        let filtered: Vec<&PlayerSummary> = match &skill {
            Some(code) => self.with_skill(code).collect(),
            None => self.players.iter().collect(),
        };
        let total = filtered.len();
        let data = filtered.into_iter().skip(offset).take(limit).collect();

        Page {
            total,
            offset,
            limit,
            skill,
            data,
        }
    }

    /// Count of each best skill with its share of the roster.
    pub fn skills_summary(&self) -> SkillBreakdown {
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for player in &self.players {
            match counts.iter_mut().find(|(skill, _)| *skill == player.best_skill) {
                Some((_, count)) => *count += 1,
                None => counts.push((player.best_skill, 1)),
            }
        }
        // Stable: equal counts stay in first-seen order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = self.players.len();
        SkillBreakdown(
            counts
                .into_iter()
                .map(|(skill, count)| SkillCount {
                    skill,
                    count,
                    percentage: if total > 0 {
                        round_to(count as f64 / total as f64 * 100.0, 2)
                    } else {
                        0.0
                    },
                })
                .collect(),
        )
    }

    /// Players whose best skill is `skill`, highest z-score first.
    pub fn top_by_skill(
        &self,
        skill: &str,
        limit: Option<i64>,
    ) -> Result<Vec<&PlayerSummary>, QueryError> {
        let mut matches: Vec<&PlayerSummary> = self.with_skill(skill).collect();
        if matches.is_empty() {
            return Err(QueryError::SkillNotFound(skill.to_string()));
        }
        matches.sort_by(|a, b| b.z_score.total_cmp(&a.z_score));
        matches.truncate(limit.unwrap_or(DEFAULT_TOP_LIMIT).max(0) as usize);
        Ok(matches)
    }

    fn with_skill<'a>(&'a self, code: &str) -> impl Iterator<Item = &'a PlayerSummary> + 'a {
        let wanted = code.to_uppercase();
        self.players
            .iter()
            .filter(move |p| p.best_skill.code() == wanted)
    }
}
