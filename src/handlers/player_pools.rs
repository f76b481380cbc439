use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::references::{ChildKind, ReferenceEngine};
use crate::store::models::PlayerPool;
use crate::AppState;

use super::{load_owned_tournament, load_parent_for_create, log_if_aborted, required_name, UNAUTHORIZED};

#[derive(Debug, Deserialize)]
pub struct PlayerPoolPayload {
    pub name: Option<String>,
    /// Desired membership. Omitted on PUT means the pool empties out.
    #[serde(default)]
    pub players: Vec<Uuid>,
}

/// GET /api/tournaments/:id/playerpools
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tournament_id): Path<Uuid>,
) -> Result<Json<Vec<PlayerPool>>, ApiError> {
    let pools = state.store.list_player_pools(tournament_id, auth.id).await?;
    Ok(Json(pools))
}

/// GET /api/tournaments/:id/playerpools/:pool_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PlayerPool>, ApiError> {
    let pool = state
        .store
        .find_player_pool(id)
        .await?
        .filter(|p| p.tournament == tournament_id && p.user == auth.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    Ok(Json(pool))
}

/// POST /api/tournaments/:id/playerpools
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tournament_id): Path<Uuid>,
    Json(payload): Json<PlayerPoolPayload>,
) -> Result<(StatusCode, Json<PlayerPool>), ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_parent_for_create(store, &auth, tournament_id).await?;

    let name = required_name(payload.name)?;
    let pool = store
        .insert_player_pool(PlayerPool::new(name, tournament.id, user.id))
        .await?;

    let engine = ReferenceEngine::new(store);
    engine
        .attach_child_to_tournament(tournament.id, pool.id, ChildKind::PlayerPool)
        .await?;
    log_if_aborted(
        engine.set_pool_members(pool.id, &payload.players).await,
        "adopting players into created pool",
    )?;

    let pool = store
        .find_player_pool(pool.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Created pool disappeared"))?;

    Ok((StatusCode::CREATED, Json(pool)))
}

/// PUT /api/tournaments/:id/playerpools/:pool_id - full replace of name and
/// membership; players dropped from the list lose their back-reference
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<PlayerPoolPayload>,
) -> Result<Json<PlayerPool>, ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_owned_tournament(store, &auth, tournament_id).await?;

    let pool = store
        .find_player_pool(id)
        .await?
        .filter(|p| p.tournament == tournament.id && p.user == user.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let name = required_name(payload.name)?;

    let engine = ReferenceEngine::new(store);
    log_if_aborted(
        engine.set_pool_members(pool.id, &payload.players).await,
        "replacing pool membership",
    )?;

    // Membership writes went through the engine; re-read before renaming so
    // the fresh players list is not clobbered.
    let mut pool = store
        .find_player_pool(pool.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Updated pool disappeared"))?;
    pool.name = name;
    store.update_player_pool(&pool).await?;

    Ok(Json(pool))
}

/// DELETE /api/tournaments/:id/playerpools/:pool_id - members are released
/// first, then the pool leaves the tournament and is removed
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_owned_tournament(store, &auth, tournament_id).await?;

    let pool = store
        .find_player_pool(id)
        .await?
        .filter(|p| p.tournament == tournament.id && p.user == user.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let engine = ReferenceEngine::new(store);
    log_if_aborted(
        engine.release_pool_members(&pool).await,
        "releasing members of deleted pool",
    )?;
    engine
        .detach_child_from_tournament(tournament.id, pool.id, ChildKind::PlayerPool)
        .await?;

    store.delete_player_pool(pool.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
