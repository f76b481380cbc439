use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

// Wire shape notes: ids serialize as strings, keys are camelCase, and the
// password hash never leaves the server. Database rows use snake_case
// `*_id` columns; the sqlx renames map them back onto these structs.

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Tournaments owned by this user, maintained by the reference engine.
    pub tournaments: Vec<Uuid>,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            tournaments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub players: Vec<Uuid>,
    pub player_pools: Vec<Uuid>,
    pub teams: Vec<Uuid>,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
}

impl Tournament {
    pub fn new(name: String, user: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            players: Vec::new(),
            player_pools: Vec::new(),
            teams: Vec::new(),
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPool {
    pub id: Uuid,
    pub name: String,
    pub players: Vec<Uuid>,
    #[sqlx(rename = "tournament_id")]
    pub tournament: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
}

impl PlayerPool {
    pub fn new(name: String, tournament: Uuid, user: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            players: Vec::new(),
            tournament,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub players: Vec<Uuid>,
    #[sqlx(rename = "tournament_id")]
    pub tournament: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
}

impl Team {
    pub fn new(name: String, tournament: Uuid, user: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            players: Vec::new(),
            tournament,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "player_pool_id")]
    pub player_pool: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "team_id")]
    pub team: Option<Uuid>,
    #[sqlx(rename = "tournament_id")]
    pub tournament: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
}

impl Player {
    pub fn new(name: String, tournament: Uuid, user: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            player_pool: None,
            team: None,
            tournament,
            user,
        }
    }
}
