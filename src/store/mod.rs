pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use models::{Player, PlayerPool, Team, Tournament, User};

/// Errors from the entity/identity store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("username is already taken")]
    UsernameTaken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Repository abstraction over the entity and identity stores.
///
/// Every method is a single-record read or write; callers composing
/// multi-record updates get no isolation between them (each `.await` is a
/// suspension point where other requests may interleave).
#[async_trait]
pub trait Store: Send + Sync {
    /// Liveness probe for the /health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;

    // Users
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn update_user(&self, user: &User) -> Result<(), StoreError>;

    // Tournaments
    async fn list_tournaments(&self, user: Uuid) -> Result<Vec<Tournament>, StoreError>;
    async fn find_tournament(&self, id: Uuid) -> Result<Option<Tournament>, StoreError>;
    async fn insert_tournament(&self, tournament: Tournament) -> Result<Tournament, StoreError>;
    async fn update_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;
    async fn delete_tournament(&self, id: Uuid) -> Result<(), StoreError>;

    // Players
    async fn list_players(&self, tournament: Uuid, user: Uuid) -> Result<Vec<Player>, StoreError>;
    async fn find_player(&self, id: Uuid) -> Result<Option<Player>, StoreError>;
    async fn insert_player(&self, player: Player) -> Result<Player, StoreError>;
    async fn update_player(&self, player: &Player) -> Result<(), StoreError>;
    async fn delete_player(&self, id: Uuid) -> Result<(), StoreError>;

    // Player pools
    async fn list_player_pools(&self, tournament: Uuid, user: Uuid) -> Result<Vec<PlayerPool>, StoreError>;
    async fn find_player_pool(&self, id: Uuid) -> Result<Option<PlayerPool>, StoreError>;
    async fn insert_player_pool(&self, pool: PlayerPool) -> Result<PlayerPool, StoreError>;
    async fn update_player_pool(&self, pool: &PlayerPool) -> Result<(), StoreError>;
    async fn delete_player_pool(&self, id: Uuid) -> Result<(), StoreError>;

    // Teams
    async fn list_teams(&self, tournament: Uuid, user: Uuid) -> Result<Vec<Team>, StoreError>;
    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError>;
    async fn insert_team(&self, team: Team) -> Result<Team, StoreError>;
    async fn update_team(&self, team: &Team) -> Result<(), StoreError>;
    async fn delete_team(&self, id: Uuid) -> Result<(), StoreError>;
}

pub type DynStore = Arc<dyn Store>;
