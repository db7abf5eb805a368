use crate::error::ApiError;
use crate::query::{ListParams, SkillBreakdown};
use crate::server::SharedState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use skillboard_core::snapshot::PlayerSummary;

const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub players_loaded: usize,
}

/// A single record when exactly one player matched, otherwise a list.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(PlayerSummary),
    Many(Vec<PlayerSummary>),
}

#[derive(Debug, Serialize)]
pub struct NameSearchResponse {
    pub status: &'static str,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: OneOrMany,
}

#[derive(Debug, Serialize)]
pub struct SkillFilter {
    pub skill: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub status: &'static str,
    pub total_players: usize,
    pub showing: usize,
    pub offset: usize,
    pub limit: usize,
    pub filter: Option<SkillFilter>,
    pub data: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub status: &'static str,
    pub data: PlayerSummary,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub status: &'static str,
    pub total_players: usize,
    pub skills: SkillBreakdown,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TopResponse {
    pub status: &'static str,
    pub skill: String,
    pub showing: usize,
    pub data: Vec<PlayerSummary>,
}

/// API description, endpoint list, and example requests.
pub async fn root(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "name": "NBA Player Skills API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Get NBA players' best skills based on z-scores",
        "total_players": state.index.len(),
        "started_at": state.started_at.to_rfc3339(),
        "endpoints": {
            "GET /": "This help page",
            "GET /health": "Health check endpoint",
            "GET /player/{name}": "Search for player by name",
            "GET /players": "List all players (with pagination)",
            "GET /player_id/{id}": "Get player by exact Player_ID",
            "GET /skills": "Get summary of best skills distribution",
            "GET /top/{skill}": "Top players whose best skill is {skill}",
        },
        "examples": {
            "search": "/player/LeBron",
            "list": "/players?limit=20&offset=0",
            "by_id": "/player_id/2544",
            "top": "/top/AST?limit=5",
        },
    }))
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        players_loaded: state.index.len(),
    })
}

/// Case-insensitive substring search on player names.
///
/// # Errors
/// Returns 404 when no name contains `name`.
pub async fn player_by_name(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<NameSearchResponse>, ApiError> {
    let mut matches: Vec<PlayerSummary> = state
        .index
        .search_by_name(&name)?
        .into_iter()
        .cloned()
        .collect();

    let count = matches.len();
    let response = if count == 1 {
        NameSearchResponse {
            status: STATUS_SUCCESS,
            count,
            message: None,
            data: OneOrMany::One(matches.remove(0)),
        }
    } else {
        NameSearchResponse {
            status: STATUS_SUCCESS,
            count,
            message: Some(format!("Found {count} players matching '{name}'")),
            data: OneOrMany::Many(matches),
        }
    };
    Ok(Json(response))
}

/// One page of players, optionally filtered to a best skill.
///
/// # Errors
/// Returns 400 when `limit` or `offset` is not an integer.
pub async fn list_players(
    State(state): State<SharedState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let Query(params) = params?;
    let page = state.index.list(&params);
    let data: Vec<PlayerSummary> = page.data.into_iter().cloned().collect();
    Ok(Json(PlayerListResponse {
        status: STATUS_SUCCESS,
        total_players: page.total,
        showing: data.len(),
        offset: page.offset,
        limit: page.limit,
        filter: page.skill.map(|skill| SkillFilter { skill }),
        data,
    }))
}

/// Exact lookup by canonical player ID.
///
/// # Errors
/// Returns 404 when no player has `player_id`.
pub async fn player_by_id(
    State(state): State<SharedState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = state.index.get_by_id(&player_id)?.clone();
    Ok(Json(PlayerResponse {
        status: STATUS_SUCCESS,
        data: player,
    }))
}

pub async fn skills_summary(State(state): State<SharedState>) -> Json<SkillsResponse> {
    Json(SkillsResponse {
        status: STATUS_SUCCESS,
        total_players: state.index.len(),
        skills: state.index.skills_summary(),
    })
}

/// Highest z-scores among players whose best skill is `skill`.
///
/// # Errors
/// Returns 404 when no player has `skill` as their best skill, and 400 when
/// `limit` is not an integer.
pub async fn top_by_skill(
    State(state): State<SharedState>,
    Path(skill): Path<String>,
    params: Result<Query<TopParams>, QueryRejection>,
) -> Result<Json<TopResponse>, ApiError> {
    let Query(params) = params?;
    let data: Vec<PlayerSummary> = state
        .index
        .top_by_skill(&skill, params.limit)?
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(TopResponse {
        status: STATUS_SUCCESS,
        skill: skill.to_uppercase(),
        showing: data.len(),
        data,
    }))
}
