use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// POST /api/login - exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = state.store.find_user_by_username(&username).await?;

    let correct_password = match &user {
        Some(u) => bcrypt::verify(&password, &u.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| correct_password) else {
        return Err(ApiError::unauthorized("Invalid username or password."));
    };

    let token = generate_jwt(Claims::new(user.id, user.username.clone()))?;

    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}
