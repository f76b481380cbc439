use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Player, PlayerPool, Team, Tournament, User};
use super::{Store, StoreError};

/// In-memory store used by the test suite and database-free development.
/// Mirrors the Postgres store's semantics: single-record write atomicity,
/// unique usernames, and nothing else.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tournaments: RwLock<HashMap<Uuid, Tournament>>,
    players: RwLock<HashMap<Uuid, Player>>,
    player_pools: RwLock<HashMap<Uuid, PlayerPool>>,
    teams: RwLock<HashMap<Uuid, Team>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UsernameTaken);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound("user")),
        }
    }

    async fn list_tournaments(&self, user: Uuid) -> Result<Vec<Tournament>, StoreError> {
        let tournaments = self.tournaments.read().await;
        Ok(tournaments.values().filter(|t| t.user == user).cloned().collect())
    }

    async fn find_tournament(&self, id: Uuid) -> Result<Option<Tournament>, StoreError> {
        Ok(self.tournaments.read().await.get(&id).cloned())
    }

    async fn insert_tournament(&self, tournament: Tournament) -> Result<Tournament, StoreError> {
        self.tournaments.write().await.insert(tournament.id, tournament.clone());
        Ok(tournament)
    }

    async fn update_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut tournaments = self.tournaments.write().await;
        match tournaments.get_mut(&tournament.id) {
            Some(existing) => {
                *existing = tournament.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound("tournament")),
        }
    }

    async fn delete_tournament(&self, id: Uuid) -> Result<(), StoreError> {
        match self.tournaments.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("tournament")),
        }
    }

    async fn list_players(&self, tournament: Uuid, user: Uuid) -> Result<Vec<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players
            .values()
            .filter(|p| p.tournament == tournament && p.user == user)
            .cloned()
            .collect())
    }

    async fn find_player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        Ok(self.players.read().await.get(&id).cloned())
    }

    async fn insert_player(&self, player: Player) -> Result<Player, StoreError> {
        self.players.write().await.insert(player.id, player.clone());
        Ok(player)
    }

    async fn update_player(&self, player: &Player) -> Result<(), StoreError> {
        let mut players = self.players.write().await;
        match players.get_mut(&player.id) {
            Some(existing) => {
                *existing = player.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound("player")),
        }
    }

    async fn delete_player(&self, id: Uuid) -> Result<(), StoreError> {
        match self.players.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("player")),
        }
    }

    async fn list_player_pools(&self, tournament: Uuid, user: Uuid) -> Result<Vec<PlayerPool>, StoreError> {
        let pools = self.player_pools.read().await;
        Ok(pools
            .values()
            .filter(|p| p.tournament == tournament && p.user == user)
            .cloned()
            .collect())
    }

    async fn find_player_pool(&self, id: Uuid) -> Result<Option<PlayerPool>, StoreError> {
        Ok(self.player_pools.read().await.get(&id).cloned())
    }

    async fn insert_player_pool(&self, pool: PlayerPool) -> Result<PlayerPool, StoreError> {
        self.player_pools.write().await.insert(pool.id, pool.clone());
        Ok(pool)
    }

    async fn update_player_pool(&self, pool: &PlayerPool) -> Result<(), StoreError> {
        let mut pools = self.player_pools.write().await;
        match pools.get_mut(&pool.id) {
            Some(existing) => {
                *existing = pool.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound("player pool")),
        }
    }

    async fn delete_player_pool(&self, id: Uuid) -> Result<(), StoreError> {
        match self.player_pools.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("player pool")),
        }
    }

    async fn list_teams(&self, tournament: Uuid, user: Uuid) -> Result<Vec<Team>, StoreError> {
        let teams = self.teams.read().await;
        Ok(teams
            .values()
            .filter(|t| t.tournament == tournament && t.user == user)
            .cloned()
            .collect())
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn insert_team(&self, team: Team) -> Result<Team, StoreError> {
        self.teams.write().await.insert(team.id, team.clone());
        Ok(team)
    }

    async fn update_team(&self, team: &Team) -> Result<(), StoreError> {
        let mut teams = self.teams.write().await;
        match teams.get_mut(&team.id) {
            Some(existing) => {
                *existing = team.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound("team")),
        }
    }

    async fn delete_team(&self, id: Uuid) -> Result<(), StoreError> {
        match self.teams.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("team")),
        }
    }
}
