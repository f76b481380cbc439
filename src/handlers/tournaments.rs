use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::references::ReferenceEngine;
use crate::store::models::Tournament;
use crate::AppState;

use super::{required_name, UNAUTHORIZED};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentPayload {
    pub name: Option<String>,
    /// Full-replace semantics: a list omitted from a PUT body becomes empty.
    #[serde(default)]
    pub players: Vec<Uuid>,
    #[serde(default)]
    pub player_pools: Vec<Uuid>,
    #[serde(default)]
    pub teams: Vec<Uuid>,
}

/// GET /api/tournaments - tournaments owned by the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    let tournaments = state.store.list_tournaments(auth.id).await?;
    Ok(Json(tournaments))
}

/// GET /api/tournaments/:id - owner-scoped lookup; a miss is 404 so this is
/// the one place "not yours" and "not there" look the same as a plain miss
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state
        .store
        .find_tournament(id)
        .await?
        .filter(|t| t.user == auth.id)
        .ok_or_else(|| ApiError::not_found("Tournament not found."))?;

    Ok(Json(tournament))
}

/// POST /api/tournaments
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<TournamentPayload>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let store = state.store.as_ref();

    let user = store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let name = required_name(payload.name)?;
    let tournament = store.insert_tournament(Tournament::new(name, user.id)).await?;

    ReferenceEngine::new(store)
        .attach_tournament_to_user(user.id, tournament.id)
        .await?;

    Ok((StatusCode::CREATED, Json(tournament)))
}

/// PUT /api/tournaments/:id - full replace of name and membership lists
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TournamentPayload>,
) -> Result<Json<Tournament>, ApiError> {
    let store = state.store.as_ref();

    let mut tournament = store
        .find_tournament(id)
        .await?
        .filter(|t| t.user == auth.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    tournament.name = required_name(payload.name)?;
    tournament.players = payload.players;
    tournament.player_pools = payload.player_pools;
    tournament.teams = payload.teams;

    store.update_tournament(&tournament).await?;

    Ok(Json(tournament))
}

/// DELETE /api/tournaments/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.as_ref();

    let tournament = store
        .find_tournament(id)
        .await?
        .filter(|t| t.user == auth.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    // TODO: cascade to the tournament's players, pools and teams; today they
    // are orphaned, matching the behavior this service replaces.
    store.delete_tournament(tournament.id).await?;

    ReferenceEngine::new(store)
        .detach_tournament_from_user(auth.id, tournament.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
