use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;

use super::models::{Player, PlayerPool, Team, Tournament, User};
use super::{Store, StoreError};

/// Postgres-backed store. List-valued reference fields live in `uuid[]`
/// columns; each write touches exactly one row, which is the only atomicity
/// the reference engine gets.
pub struct PgStore {
    pool: PgPool,
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        tournaments UUID[] NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS tournaments (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        players UUID[] NOT NULL DEFAULT '{}',
        player_pools UUID[] NOT NULL DEFAULT '{}',
        teams UUID[] NOT NULL DEFAULT '{}',
        user_id UUID NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS player_pools (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        players UUID[] NOT NULL DEFAULT '{}',
        tournament_id UUID NOT NULL,
        user_id UUID NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS teams (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        players UUID[] NOT NULL DEFAULT '{}',
        tournament_id UUID NOT NULL,
        user_id UUID NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS players (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        player_pool_id UUID,
        team_id UUID,
        tournament_id UUID NOT NULL,
        user_id UUID NOT NULL
    )",
];

impl PgStore {
    /// Connect using the configured URL and create missing tables.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let url = config
            .database
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(url)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        info!("Connected to database");
        Ok(Self { pool })
    }

    fn map_insert_err(err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return StoreError::UsernameTaken;
            }
        }
        StoreError::Sqlx(err)
    }

    fn require_row(affected: u64, what: &'static str) -> Result<(), StoreError> {
        if affected == 0 {
            return Err(StoreError::NotFound(what));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, tournaments) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.tournaments)
        .execute(&self.pool)
        .await
        .map_err(Self::map_insert_err)?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, tournaments FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, tournaments FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET tournaments = $2 WHERE id = $1")
            .bind(user.id)
            .bind(&user.tournaments)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "user")
    }

    async fn list_tournaments(&self, user: Uuid) -> Result<Vec<Tournament>, StoreError> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            "SELECT id, name, players, player_pools, teams, user_id
             FROM tournaments WHERE user_id = $1",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(tournaments)
    }

    async fn find_tournament(&self, id: Uuid) -> Result<Option<Tournament>, StoreError> {
        let tournament = sqlx::query_as::<_, Tournament>(
            "SELECT id, name, players, player_pools, teams, user_id
             FROM tournaments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tournament)
    }

    async fn insert_tournament(&self, tournament: Tournament) -> Result<Tournament, StoreError> {
        sqlx::query(
            "INSERT INTO tournaments (id, name, players, player_pools, teams, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(tournament.id)
        .bind(&tournament.name)
        .bind(&tournament.players)
        .bind(&tournament.player_pools)
        .bind(&tournament.teams)
        .bind(tournament.user)
        .execute(&self.pool)
        .await?;
        Ok(tournament)
    }

    async fn update_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE tournaments SET name = $2, players = $3, player_pools = $4, teams = $5
             WHERE id = $1",
        )
        .bind(tournament.id)
        .bind(&tournament.name)
        .bind(&tournament.players)
        .bind(&tournament.player_pools)
        .bind(&tournament.teams)
        .execute(&self.pool)
        .await?;
        Self::require_row(result.rows_affected(), "tournament")
    }

    async fn delete_tournament(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "tournament")
    }

    async fn list_players(&self, tournament: Uuid, user: Uuid) -> Result<Vec<Player>, StoreError> {
        let players = sqlx::query_as::<_, Player>(
            "SELECT id, name, player_pool_id, team_id, tournament_id, user_id
             FROM players WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament)
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(players)
    }

    async fn find_player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        let player = sqlx::query_as::<_, Player>(
            "SELECT id, name, player_pool_id, team_id, tournament_id, user_id
             FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(player)
    }

    async fn insert_player(&self, player: Player) -> Result<Player, StoreError> {
        sqlx::query(
            "INSERT INTO players (id, name, player_pool_id, team_id, tournament_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.player_pool)
        .bind(player.team)
        .bind(player.tournament)
        .bind(player.user)
        .execute(&self.pool)
        .await?;
        Ok(player)
    }

    async fn update_player(&self, player: &Player) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE players SET name = $2, player_pool_id = $3, team_id = $4 WHERE id = $1",
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.player_pool)
        .bind(player.team)
        .execute(&self.pool)
        .await?;
        Self::require_row(result.rows_affected(), "player")
    }

    async fn delete_player(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "player")
    }

    async fn list_player_pools(&self, tournament: Uuid, user: Uuid) -> Result<Vec<PlayerPool>, StoreError> {
        let pools = sqlx::query_as::<_, PlayerPool>(
            "SELECT id, name, players, tournament_id, user_id
             FROM player_pools WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament)
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(pools)
    }

    async fn find_player_pool(&self, id: Uuid) -> Result<Option<PlayerPool>, StoreError> {
        let pool = sqlx::query_as::<_, PlayerPool>(
            "SELECT id, name, players, tournament_id, user_id FROM player_pools WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pool)
    }

    async fn insert_player_pool(&self, pool: PlayerPool) -> Result<PlayerPool, StoreError> {
        sqlx::query(
            "INSERT INTO player_pools (id, name, players, tournament_id, user_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(pool.id)
        .bind(&pool.name)
        .bind(&pool.players)
        .bind(pool.tournament)
        .bind(pool.user)
        .execute(&self.pool)
        .await?;
        Ok(pool)
    }

    async fn update_player_pool(&self, pool: &PlayerPool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE player_pools SET name = $2, players = $3 WHERE id = $1")
            .bind(pool.id)
            .bind(&pool.name)
            .bind(&pool.players)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "player pool")
    }

    async fn delete_player_pool(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM player_pools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "player pool")
    }

    async fn list_teams(&self, tournament: Uuid, user: Uuid) -> Result<Vec<Team>, StoreError> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT id, name, players, tournament_id, user_id
             FROM teams WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament)
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        let team = sqlx::query_as::<_, Team>(
            "SELECT id, name, players, tournament_id, user_id FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(team)
    }

    async fn insert_team(&self, team: Team) -> Result<Team, StoreError> {
        sqlx::query(
            "INSERT INTO teams (id, name, players, tournament_id, user_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.players)
        .bind(team.tournament)
        .bind(team.user)
        .execute(&self.pool)
        .await?;
        Ok(team)
    }

    async fn update_team(&self, team: &Team) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE teams SET name = $2, players = $3 WHERE id = $1")
            .bind(team.id)
            .bind(&team.name)
            .bind(&team.players)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "team")
    }

    async fn delete_team(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::require_row(result.rows_affected(), "team")
    }
}
