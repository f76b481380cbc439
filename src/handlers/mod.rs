pub mod login;
pub mod player_pools;
pub mod players;
pub mod teams;
pub mod tournaments;
pub mod users;

use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::references::ReferenceError;
use crate::store::models::{Tournament, User};
use crate::store::Store;

/// Ownership failures and missing ownership-scoped records share one message
/// so callers cannot probe for other users' data.
pub(crate) const UNAUTHORIZED: &str = "Unauthorized request";

pub(crate) const INVALID_DATA: &str = "Request didn't contain valid data.";

/// Resolve the acting user and the tournament from the path, requiring that
/// the caller owns the tournament. Any failure is 401.
pub(crate) async fn load_owned_tournament(
    store: &dyn Store,
    auth: &AuthUser,
    tournament_id: Uuid,
) -> Result<(User, Tournament), ApiError> {
    let user = store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    let tournament = store
        .find_tournament(tournament_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    if tournament.user != user.id {
        return Err(ApiError::unauthorized(UNAUTHORIZED));
    }

    Ok((user, tournament))
}

/// Variant for sub-resource creation: a parent tournament that does not
/// resolve is the caller's mistake (400), while an ownership mismatch stays
/// 401.
pub(crate) async fn load_parent_for_create(
    store: &dyn Store,
    auth: &AuthUser,
    tournament_id: Uuid,
) -> Result<(User, Tournament), ApiError> {
    let tournament = store
        .find_tournament(tournament_id)
        .await?
        .ok_or_else(|| ApiError::bad_request(INVALID_DATA))?;

    let user = store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))?;

    if tournament.user != user.id {
        return Err(ApiError::unauthorized(UNAUTHORIZED));
    }

    Ok((user, tournament))
}

/// Every resource requires a non-empty name.
pub(crate) fn required_name(name: Option<String>) -> Result<String, ApiError> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n),
        _ => Err(ApiError::validation_error("Name is required.")),
    }
}

/// A reference-maintenance step that hit an unresolved id stops silently:
/// the remaining steps are skipped, the request carries on with whatever
/// state was already persisted, and the abort is only logged. Store-level
/// failures still fail the request.
pub(crate) fn log_if_aborted(result: Result<(), ReferenceError>, context: &str) -> Result<(), ApiError> {
    match result {
        Ok(()) => Ok(()),
        Err(ReferenceError::NotFound(missing)) => {
            warn!("{}: {} not found, remaining reference updates skipped", context, missing);
            Ok(())
        }
        Err(other) => Err(other.into()),
    }
}
