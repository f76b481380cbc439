use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::references::{ChildKind, ReferenceEngine};
use crate::store::models::Player;
use crate::AppState;

use super::{load_owned_tournament, load_parent_for_create, log_if_aborted, required_name, UNAUTHORIZED};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub name: Option<String>,
    /// Optional links; on PUT an omitted link clears the existing one.
    pub player_pool: Option<Uuid>,
    pub team: Option<Uuid>,
}

/// GET /api/tournaments/:id/players
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tournament_id): Path<Uuid>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let players = state.store.list_players(tournament_id, auth.id).await?;
    Ok(Json(players))
}

/// GET /api/tournaments/:id/players/:player_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Player>, ApiError> {
    let player = state
        .store
        .find_player(id)
        .await?
        .filter(|p| p.tournament == tournament_id && p.user == auth.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    Ok(Json(player))
}

/// POST /api/tournaments/:id/players
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tournament_id): Path<Uuid>,
    Json(payload): Json<PlayerPayload>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_parent_for_create(store, &auth, tournament_id).await?;

    let name = required_name(payload.name)?;
    let player = store.insert_player(Player::new(name, tournament.id, user.id)).await?;

    let engine = ReferenceEngine::new(store);
    if let Some(pool_id) = payload.player_pool {
        log_if_aborted(
            engine.attach_player_to_pool(player.id, pool_id).await,
            "linking created player to pool",
        )?;
    }
    if let Some(team_id) = payload.team {
        log_if_aborted(
            engine.attach_player_to_team(player.id, team_id).await,
            "linking created player to team",
        )?;
    }
    engine
        .attach_child_to_tournament(tournament.id, player.id, ChildKind::Player)
        .await?;

    let player = store
        .find_player(player.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Created player disappeared"))?;

    Ok((StatusCode::CREATED, Json(player)))
}

/// PUT /api/tournaments/:id/players/:player_id - full replace; links are
/// cleared first and re-established from the body
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<PlayerPayload>,
) -> Result<Json<Player>, ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_owned_tournament(store, &auth, tournament_id).await?;

    let player = store
        .find_player(id)
        .await?
        .filter(|p| p.tournament == tournament.id && p.user == user.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let name = required_name(payload.name)?;

    let engine = ReferenceEngine::new(store);
    engine.detach_player_from_pool(player.id).await?;
    engine.detach_player_from_team(player.id).await?;

    let mut player = store
        .find_player(player.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;
    player.name = name;
    store.update_player(&player).await?;

    if let Some(pool_id) = payload.player_pool {
        log_if_aborted(
            engine.attach_player_to_pool(player.id, pool_id).await,
            "relinking player to pool",
        )?;
    }
    if let Some(team_id) = payload.team {
        log_if_aborted(
            engine.attach_player_to_team(player.id, team_id).await,
            "relinking player to team",
        )?;
    }

    let player = store
        .find_player(player.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Updated player disappeared"))?;

    Ok(Json(player))
}

/// DELETE /api/tournaments/:id/players/:player_id - detach from pool, team
/// and tournament, in that order, then remove the record
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_owned_tournament(store, &auth, tournament_id).await?;

    let player = store
        .find_player(id)
        .await?
        .filter(|p| p.tournament == tournament.id && p.user == user.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let engine = ReferenceEngine::new(store);
    engine.detach_player_from_pool(player.id).await?;
    engine.detach_player_from_team(player.id).await?;
    engine
        .detach_child_from_tournament(tournament.id, player.id, ChildKind::Player)
        .await?;

    store.delete_player(player.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
