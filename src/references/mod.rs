//! Reference maintenance between tournament records.
//!
//! Tournament, PlayerPool, Team and Player records carry id lists pointing at
//! each other, and the store persists one record per write. Every routine
//! here is therefore a sequence of non-transactional single-record writes: a
//! crash between two writes can leave one side of a link updated and the
//! other not. Link changes apply in remove-old-then-add-new order so a player
//! is never a member of two pools (or teams) at once from a reader's
//! perspective; the first id that fails to resolve aborts the remaining
//! steps of the routine.

use thiserror::Error;
use uuid::Uuid;

use crate::store::models::{Player, PlayerPool, Team, Tournament, User};
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which tournament membership list a child belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Player,
    PlayerPool,
    Team,
}

pub struct ReferenceEngine<'a> {
    store: &'a dyn Store,
}

impl<'a> ReferenceEngine<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    async fn require_player(&self, id: Uuid) -> Result<Player, ReferenceError> {
        self.store
            .find_player(id)
            .await?
            .ok_or(ReferenceError::NotFound("player"))
    }

    async fn require_pool(&self, id: Uuid) -> Result<PlayerPool, ReferenceError> {
        self.store
            .find_player_pool(id)
            .await?
            .ok_or(ReferenceError::NotFound("player pool"))
    }

    async fn require_team(&self, id: Uuid) -> Result<Team, ReferenceError> {
        self.store
            .find_team(id)
            .await?
            .ok_or(ReferenceError::NotFound("team"))
    }

    async fn require_tournament(&self, id: Uuid) -> Result<Tournament, ReferenceError> {
        self.store
            .find_tournament(id)
            .await?
            .ok_or(ReferenceError::NotFound("tournament"))
    }

    async fn require_user(&self, id: Uuid) -> Result<User, ReferenceError> {
        self.store
            .find_user(id)
            .await?
            .ok_or(ReferenceError::NotFound("user"))
    }

    /// Link a player into a pool. If the player was in a different pool, its
    /// membership there is removed and persisted before the new link becomes
    /// visible.
    pub async fn attach_player_to_pool(&self, player_id: Uuid, pool_id: Uuid) -> Result<(), ReferenceError> {
        let mut player = self.require_player(player_id).await?;
        let mut pool = self.require_pool(pool_id).await?;

        if let Some(previous_id) = player.player_pool {
            if previous_id != pool_id {
                if let Some(mut previous) = self.store.find_player_pool(previous_id).await? {
                    previous.players.retain(|id| *id != player_id);
                    self.store.update_player_pool(&previous).await?;
                }
            }
        }

        if !pool.players.contains(&player_id) {
            pool.players.push(player_id);
            self.store.update_player_pool(&pool).await?;
        }

        if player.player_pool != Some(pool_id) {
            player.player_pool = Some(pool_id);
            self.store.update_player(&player).await?;
        }

        Ok(())
    }

    /// Clear a player's pool link. Succeeds silently when the player has no
    /// pool; tolerates the pool record itself being gone.
    pub async fn detach_player_from_pool(&self, player_id: Uuid) -> Result<(), ReferenceError> {
        let mut player = self.require_player(player_id).await?;

        let Some(pool_id) = player.player_pool else {
            return Ok(());
        };

        if let Some(mut pool) = self.store.find_player_pool(pool_id).await? {
            pool.players.retain(|id| *id != player_id);
            self.store.update_player_pool(&pool).await?;
        }

        player.player_pool = None;
        self.store.update_player(&player).await?;

        Ok(())
    }

    /// Link a player into a team, removing it from its previous team first.
    pub async fn attach_player_to_team(&self, player_id: Uuid, team_id: Uuid) -> Result<(), ReferenceError> {
        let mut player = self.require_player(player_id).await?;
        let mut team = self.require_team(team_id).await?;

        if let Some(previous_id) = player.team {
            if previous_id != team_id {
                if let Some(mut previous) = self.store.find_team(previous_id).await? {
                    previous.players.retain(|id| *id != player_id);
                    self.store.update_team(&previous).await?;
                }
            }
        }

        if !team.players.contains(&player_id) {
            team.players.push(player_id);
            self.store.update_team(&team).await?;
        }

        if player.team != Some(team_id) {
            player.team = Some(team_id);
            self.store.update_player(&player).await?;
        }

        Ok(())
    }

    /// Clear a player's team link; silent no-op when the player has no team.
    pub async fn detach_player_from_team(&self, player_id: Uuid) -> Result<(), ReferenceError> {
        let mut player = self.require_player(player_id).await?;

        let Some(team_id) = player.team else {
            return Ok(());
        };

        if let Some(mut team) = self.store.find_team(team_id).await? {
            team.players.retain(|id| *id != player_id);
            self.store.update_team(&team).await?;
        }

        player.team = None;
        self.store.update_player(&player).await?;

        Ok(())
    }

    /// Append a child id to the tournament's membership list. Append-only: a
    /// child belongs to exactly one tournament for its lifetime.
    pub async fn attach_child_to_tournament(
        &self,
        tournament_id: Uuid,
        child_id: Uuid,
        kind: ChildKind,
    ) -> Result<(), ReferenceError> {
        let mut tournament = self.require_tournament(tournament_id).await?;
        let list = match kind {
            ChildKind::Player => &mut tournament.players,
            ChildKind::PlayerPool => &mut tournament.player_pools,
            ChildKind::Team => &mut tournament.teams,
        };

        if !list.contains(&child_id) {
            list.push(child_id);
            self.store.update_tournament(&tournament).await?;
        }

        Ok(())
    }

    /// Filter a child id out of the tournament's membership list; tolerates
    /// the id already being absent.
    pub async fn detach_child_from_tournament(
        &self,
        tournament_id: Uuid,
        child_id: Uuid,
        kind: ChildKind,
    ) -> Result<(), ReferenceError> {
        let mut tournament = self.require_tournament(tournament_id).await?;
        let list = match kind {
            ChildKind::Player => &mut tournament.players,
            ChildKind::PlayerPool => &mut tournament.player_pools,
            ChildKind::Team => &mut tournament.teams,
        };

        let before = list.len();
        list.retain(|id| *id != child_id);
        if list.len() != before {
            self.store.update_tournament(&tournament).await?;
        }

        Ok(())
    }

    /// Record a tournament on its owner's list.
    pub async fn attach_tournament_to_user(&self, user_id: Uuid, tournament_id: Uuid) -> Result<(), ReferenceError> {
        let mut user = self.require_user(user_id).await?;
        if !user.tournaments.contains(&tournament_id) {
            user.tournaments.push(tournament_id);
            self.store.update_user(&user).await?;
        }
        Ok(())
    }

    /// Drop a tournament from its owner's list; tolerates absence.
    pub async fn detach_tournament_from_user(&self, user_id: Uuid, tournament_id: Uuid) -> Result<(), ReferenceError> {
        let mut user = self.require_user(user_id).await?;
        let before = user.tournaments.len();
        user.tournaments.retain(|id| *id != tournament_id);
        if user.tournaments.len() != before {
            self.store.update_user(&user).await?;
        }
        Ok(())
    }

    /// Replace a pool's membership with `desired`: players no longer listed
    /// are detached (their back-reference cleared), then new players are
    /// attached in request order. The first unresolved player id aborts the
    /// remaining steps.
    pub async fn set_pool_members(&self, pool_id: Uuid, desired: &[Uuid]) -> Result<(), ReferenceError> {
        let pool = self.require_pool(pool_id).await?;

        for member in pool.players.clone() {
            if !desired.contains(&member) {
                self.detach_player_from_pool(member).await?;
            }
        }

        for member in desired {
            if !pool.players.contains(member) {
                self.attach_player_to_pool(*member, pool_id).await?;
            }
        }

        Ok(())
    }

    /// Replace a team's membership with `desired`; same contract as
    /// [`set_pool_members`](Self::set_pool_members).
    pub async fn set_team_members(&self, team_id: Uuid, desired: &[Uuid]) -> Result<(), ReferenceError> {
        let team = self.require_team(team_id).await?;

        for member in team.players.clone() {
            if !desired.contains(&member) {
                self.detach_player_from_team(member).await?;
            }
        }

        for member in desired {
            if !team.players.contains(member) {
                self.attach_player_to_team(*member, team_id).await?;
            }
        }

        Ok(())
    }

    /// Clear the pool back-reference on every member, ahead of the pool
    /// record being deleted. The pool's own list is left untouched.
    pub async fn release_pool_members(&self, pool: &PlayerPool) -> Result<(), ReferenceError> {
        for member in &pool.players {
            let mut player = self.require_player(*member).await?;
            player.player_pool = None;
            self.store.update_player(&player).await?;
        }
        Ok(())
    }

    /// Clear the team back-reference on every member, ahead of the team
    /// record being deleted.
    pub async fn release_team_members(&self, team: &Team) -> Result<(), ReferenceError> {
        for member in &team.players {
            let mut player = self.require_player(*member).await?;
            player.team = None;
            self.store.update_player(&player).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    async fn seed(store: &MemoryStore) -> (Uuid, Uuid) {
        let user = store
            .insert_user(User::new("owner".into(), "hash".into()))
            .await
            .unwrap();
        let tournament = store
            .insert_tournament(Tournament::new("Cup".into(), user.id))
            .await
            .unwrap();
        (user.id, tournament.id)
    }

    async fn seed_player(store: &MemoryStore, tournament: Uuid, user: Uuid, name: &str) -> Uuid {
        store
            .insert_player(Player::new(name.into(), tournament, user))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn attach_moves_player_between_pools() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let player = seed_player(&store, tournament, user, "Bob").await;
        let pool_a = store
            .insert_player_pool(PlayerPool::new("A".into(), tournament, user))
            .await
            .unwrap()
            .id;
        let pool_b = store
            .insert_player_pool(PlayerPool::new("B".into(), tournament, user))
            .await
            .unwrap()
            .id;

        let engine = ReferenceEngine::new(&store);
        engine.attach_player_to_pool(player, pool_a).await.unwrap();
        engine.attach_player_to_pool(player, pool_b).await.unwrap();

        let a = store.find_player_pool(pool_a).await.unwrap().unwrap();
        let b = store.find_player_pool(pool_b).await.unwrap().unwrap();
        let p = store.find_player(player).await.unwrap().unwrap();

        assert!(a.players.is_empty(), "old pool still lists the player");
        assert_eq!(b.players, vec![player]);
        assert_eq!(p.player_pool, Some(pool_b));
    }

    #[tokio::test]
    async fn attach_is_idempotent() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let player = seed_player(&store, tournament, user, "Bob").await;
        let pool = store
            .insert_player_pool(PlayerPool::new("A".into(), tournament, user))
            .await
            .unwrap()
            .id;

        let engine = ReferenceEngine::new(&store);
        engine.attach_player_to_pool(player, pool).await.unwrap();
        engine.attach_player_to_pool(player, pool).await.unwrap();

        let p = store.find_player_pool(pool).await.unwrap().unwrap();
        assert_eq!(p.players, vec![player]);
    }

    #[tokio::test]
    async fn attach_to_unknown_pool_fails() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let player = seed_player(&store, tournament, user, "Bob").await;

        let engine = ReferenceEngine::new(&store);
        let result = engine.attach_player_to_pool(player, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ReferenceError::NotFound("player pool"))));

        // The player must be untouched after the abort
        let p = store.find_player(player).await.unwrap().unwrap();
        assert_eq!(p.player_pool, None);
    }

    #[tokio::test]
    async fn detach_without_pool_is_a_noop() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let player = seed_player(&store, tournament, user, "Bob").await;

        let engine = ReferenceEngine::new(&store);
        engine.detach_player_from_pool(player).await.unwrap();
    }

    #[tokio::test]
    async fn tournament_lists_are_append_only_and_tolerant() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let player = seed_player(&store, tournament, user, "Bob").await;

        let engine = ReferenceEngine::new(&store);
        engine
            .attach_child_to_tournament(tournament, player, ChildKind::Player)
            .await
            .unwrap();
        engine
            .attach_child_to_tournament(tournament, player, ChildKind::Player)
            .await
            .unwrap();

        let t = store.find_tournament(tournament).await.unwrap().unwrap();
        assert_eq!(t.players, vec![player]);

        engine
            .detach_child_from_tournament(tournament, player, ChildKind::Player)
            .await
            .unwrap();
        // Detaching an id that is already gone succeeds
        engine
            .detach_child_from_tournament(tournament, player, ChildKind::Player)
            .await
            .unwrap();

        let t = store.find_tournament(tournament).await.unwrap().unwrap();
        assert!(t.players.is_empty());
    }

    #[tokio::test]
    async fn set_pool_members_clears_dropped_back_references() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let kept = seed_player(&store, tournament, user, "Kept").await;
        let dropped = seed_player(&store, tournament, user, "Dropped").await;
        let pool = store
            .insert_player_pool(PlayerPool::new("A".into(), tournament, user))
            .await
            .unwrap()
            .id;

        let engine = ReferenceEngine::new(&store);
        engine.set_pool_members(pool, &[kept, dropped]).await.unwrap();
        engine.set_pool_members(pool, &[kept]).await.unwrap();

        let p = store.find_player_pool(pool).await.unwrap().unwrap();
        assert_eq!(p.players, vec![kept]);

        let d = store.find_player(dropped).await.unwrap().unwrap();
        assert_eq!(d.player_pool, None, "dropped member still points at the pool");
    }

    #[tokio::test]
    async fn release_team_members_clears_every_back_reference() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;
        let a = seed_player(&store, tournament, user, "A").await;
        let b = seed_player(&store, tournament, user, "B").await;
        let team_id = store
            .insert_team(Team::new("Reds".into(), tournament, user))
            .await
            .unwrap()
            .id;

        let engine = ReferenceEngine::new(&store);
        engine.set_team_members(team_id, &[a, b]).await.unwrap();

        let team = store.find_team(team_id).await.unwrap().unwrap();
        engine.release_team_members(&team).await.unwrap();

        for id in [a, b] {
            let p = store.find_player(id).await.unwrap().unwrap();
            assert_eq!(p.team, None);
        }
    }

    #[tokio::test]
    async fn user_tournament_list_follows_create_and_delete() {
        let store = MemoryStore::new();
        let (user, tournament) = seed(&store).await;

        let engine = ReferenceEngine::new(&store);
        engine.attach_tournament_to_user(user, tournament).await.unwrap();
        let u = store.find_user(user).await.unwrap().unwrap();
        assert_eq!(u.tournaments, vec![tournament]);

        engine.detach_tournament_from_user(user, tournament).await.unwrap();
        let u = store.find_user(user).await.unwrap().unwrap();
        assert!(u.tournaments.is_empty());
    }
}
