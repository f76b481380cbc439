use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::config;
use crate::error::ApiError;
use crate::store::models::User;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/users - register a new user
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let username = payload
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::validation_error("Username is required."))?;

    let password = payload.password.unwrap_or_default();
    if password.len() < 3 {
        return Err(ApiError::validation_error(
            "Password needs to be at least 3 characters long.",
        ));
    }

    if state.store.find_user_by_username(&username).await?.is_some() {
        return Err(ApiError::validation_error("Username is already taken."));
    }

    let cost = config::config().security.bcrypt_cost;
    let password_hash = bcrypt::hash(&password, cost)?;

    let user = state.store.insert_user(User::new(username, password_hash)).await?;

    Ok((StatusCode::CREATED, Json(user)))
}
