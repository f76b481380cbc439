use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::references::{ChildKind, ReferenceEngine};
use crate::store::models::Team;
use crate::AppState;

use super::{load_owned_tournament, load_parent_for_create, log_if_aborted, required_name, UNAUTHORIZED};

#[derive(Debug, Deserialize)]
pub struct TeamPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub players: Vec<Uuid>,
}

/// GET /api/tournaments/:id/teams
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tournament_id): Path<Uuid>,
) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = state.store.list_teams(tournament_id, auth.id).await?;
    Ok(Json(teams))
}

/// GET /api/tournaments/:id/teams/:team_id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Team>, ApiError> {
    let team = state
        .store
        .find_team(id)
        .await?
        .filter(|t| t.tournament == tournament_id && t.user == auth.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    Ok(Json(team))
}

/// POST /api/tournaments/:id/teams
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tournament_id): Path<Uuid>,
    Json(payload): Json<TeamPayload>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_parent_for_create(store, &auth, tournament_id).await?;

    let name = required_name(payload.name)?;
    let team = store.insert_team(Team::new(name, tournament.id, user.id)).await?;

    let engine = ReferenceEngine::new(store);
    engine
        .attach_child_to_tournament(tournament.id, team.id, ChildKind::Team)
        .await?;
    log_if_aborted(
        engine.set_team_members(team.id, &payload.players).await,
        "adopting players into created team",
    )?;

    let team = store
        .find_team(team.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Created team disappeared"))?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// PUT /api/tournaments/:id/teams/:team_id - full replace of name and
/// membership; players dropped from the list lose their back-reference
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TeamPayload>,
) -> Result<Json<Team>, ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_owned_tournament(store, &auth, tournament_id).await?;

    let team = store
        .find_team(id)
        .await?
        .filter(|t| t.tournament == tournament.id && t.user == user.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let name = required_name(payload.name)?;

    let engine = ReferenceEngine::new(store);
    log_if_aborted(
        engine.set_team_members(team.id, &payload.players).await,
        "replacing team membership",
    )?;

    let mut team = store
        .find_team(team.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Updated team disappeared"))?;
    team.name = name;
    store.update_team(&team).await?;

    Ok(Json(team))
}

/// DELETE /api/tournaments/:id/teams/:team_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((tournament_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.as_ref();
    let (user, tournament) = load_owned_tournament(store, &auth, tournament_id).await?;

    let team = store
        .find_team(id)
        .await?
        .filter(|t| t.tournament == tournament.id && t.user == user.id)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let engine = ReferenceEngine::new(store);
    log_if_aborted(
        engine.release_team_members(&team).await,
        "releasing members of deleted team",
    )?;
    engine
        .detach_child_from_tournament(tournament.id, team.id, ChildKind::Team)
        .await?;

    store.delete_team(team.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
