pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod references;
pub mod store;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use store::DynStore;

#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
}

/// Build the application router over any store implementation. The frontend
/// build directory is served for everything the API does not match.
pub fn app(store: DynStore) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health))
        .merge(public_routes())
        .merge(tournament_routes())
        .fallback_service(ServeDir::new("build"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(handlers::users::create))
        .route("/api/login", post(handlers::login::login))
}

fn tournament_routes() -> Router<AppState> {
    use handlers::{player_pools, players, teams, tournaments};

    Router::new()
        .route(
            "/api/tournaments",
            get(tournaments::list).post(tournaments::create),
        )
        .route(
            "/api/tournaments/:id",
            get(tournaments::get)
                .put(tournaments::update)
                .delete(tournaments::delete),
        )
        .route(
            "/api/tournaments/:id/players",
            get(players::list).post(players::create),
        )
        .route(
            "/api/tournaments/:id/players/:player_id",
            get(players::get).put(players::update).delete(players::delete),
        )
        .route(
            "/api/tournaments/:id/playerpools",
            get(player_pools::list).post(player_pools::create),
        )
        .route(
            "/api/tournaments/:id/playerpools/:pool_id",
            get(player_pools::get)
                .put(player_pools::update)
                .delete(player_pools::delete),
        )
        .route(
            "/api/tournaments/:id/teams",
            get(teams::list).post(teams::create),
        )
        .route(
            "/api/tournaments/:id/teams/:team_id",
            get(teams::get).put(teams::update).delete(teams::delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": e.to_string(),
            })),
        ),
    }
}
