//! The game service: every player-facing operation.
//!
//! Each operation is one load, validate, apply, save cycle against a single
//! player, run under that player's lock. Operations on different players
//! never wait on each other.

pub mod crafting;
pub mod loadout;
pub mod shop;

pub use crafting::CraftReport;
pub use shop::Trade;

use crate::catalog::Catalog;
use crate::combat::types::Enemy;
use crate::core::error::{GameError, Result};
use crate::core::game_state::PlayerState;
use crate::core::offline::{advance_player, AdvanceReport};
use crate::items::Item;
use crate::skills::types::SkillId;
use crate::store::{PlayerStore, StoreError};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

type LockRegistry = Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// A claim on one player's lock. The registry entry lives exactly as long
/// as some lease on it does, so looking up unknown ids leaves nothing behind
/// and every concurrent caller for an id shares the same mutex.
struct PlayerLease<'a> {
    registry: &'a LockRegistry,
    id: String,
    lock: Option<Arc<Mutex<()>>>,
}

impl PlayerLease<'_> {
    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        let lock = self.lock.as_deref().ok_or(StoreError::LockPoisoned)?;
        lock.lock()
            .map_err(|_| GameError::from(StoreError::LockPoisoned))
    }
}

impl Drop for PlayerLease<'_> {
    fn drop(&mut self) {
        // Reference counts only change while the registry is locked.
        let mut locks = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        drop(self.lock.take());
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

pub struct Game<S: PlayerStore, C: Catalog> {
    store: S,
    catalog: C,
    max_catch_up_ms: Option<i64>,
    locks: LockRegistry,
}

impl<S: PlayerStore, C: Catalog> Game<S, C> {
    pub fn new(store: S, catalog: C) -> Self {
        Self {
            store,
            catalog,
            max_catch_up_ms: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Bounds how much time a single `advance` simulates.
    pub fn with_max_catch_up(mut self, max_catch_up_ms: Option<i64>) -> Self {
        self.max_catch_up_ms = max_catch_up_ms;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn lease(&self, id: &str) -> Result<PlayerLease<'_>> {
        let mut locks = self.locks.lock().map_err(|_| StoreError::LockPoisoned)?;
        let lock = Arc::clone(locks.entry(id.to_string()).or_default());
        Ok(PlayerLease {
            registry: &self.locks,
            id: id.to_string(),
            lock: Some(lock),
        })
    }

    /// Runs `f` against a freshly loaded copy of the player and saves the
    /// result. Nothing is saved when `f` fails.
    fn with_player<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut PlayerState, &C) -> Result<T>,
    ) -> Result<T> {
        let lease = self.lease(id)?;
        let _guard = lease.guard()?;

        let mut player = self
            .store
            .get(id)?
            .ok_or_else(|| GameError::player_not_found(id))?;
        let value = f(&mut player, &self.catalog)?;
        self.store.save(&player)?;
        Ok(value)
    }

    /// Creates a player with every skill at level 1 and the starting gold.
    pub fn create_player(&self, id: &str, now: i64) -> Result<PlayerState> {
        let lease = self.lease(id)?;
        let _guard = lease.guard()?;

        if self.store.exists(id)? {
            return Err(GameError::PlayerExists(id.to_string()));
        }
        let player = PlayerState::new(id.to_string(), now, &self.catalog);
        self.store.save(&player)?;
        info!(player = %id, "created player");
        Ok(player)
    }

    /// Current state of a player, without advancing it.
    pub fn player(&self, id: &str) -> Result<PlayerState> {
        let lease = self.lease(id)?;
        let _guard = lease.guard()?;
        self.store
            .get(id)?
            .ok_or_else(|| GameError::player_not_found(id))
    }

    pub fn list_players(&self) -> Result<Vec<String>> {
        Ok(self.store.list_ids()?)
    }

    pub fn delete_player(&self, id: &str) -> Result<()> {
        let lease = self.lease(id)?;
        let _guard = lease.guard()?;
        if !self.store.delete(id)? {
            return Err(GameError::player_not_found(id));
        }
        info!(player = %id, "deleted player");
        Ok(())
    }

    /// Simulates everything that happened between the player's last update
    /// and `now`.
    pub fn advance(&self, id: &str, now: i64) -> Result<AdvanceReport> {
        self.advance_with_rng(id, now, &mut rand::thread_rng())
    }

    pub fn advance_with_rng(
        &self,
        id: &str,
        now: i64,
        rng: &mut impl Rng,
    ) -> Result<AdvanceReport> {
        let max_catch_up_ms = self.max_catch_up_ms;
        self.with_player(id, |player, catalog| {
            let report = advance_player(player, now, catalog, max_catch_up_ms, rng);
            debug!(
                player = %id,
                elapsed_ms = report.elapsed_ms,
                failures = report.failures.len(),
                "advance finished"
            );
            Ok(report)
        })
    }

    pub fn start_skill(&self, id: &str, skill: SkillId) -> Result<()> {
        self.set_skill_active(id, skill, true)
    }

    pub fn stop_skill(&self, id: &str, skill: SkillId) -> Result<()> {
        self.set_skill_active(id, skill, false)
    }

    fn set_skill_active(&self, id: &str, skill: SkillId, active: bool) -> Result<()> {
        self.with_player(id, |player, _| {
            if skill.is_combat() {
                return Err(GameError::NotIdleSkill(skill));
            }
            let state = player
                .skill_mut(skill)
                .ok_or_else(|| GameError::skill_not_found(skill))?;
            state.is_active = active;
            Ok(())
        })
    }

    pub fn buy_item(&self, id: &str, item_id: &str, quantity: u32) -> Result<Trade> {
        self.with_player(id, |player, catalog| {
            shop::buy_item(player, catalog, item_id, quantity)
        })
    }

    pub fn sell_item(&self, id: &str, item_id: &str, quantity: u32) -> Result<Trade> {
        self.with_player(id, |player, catalog| {
            shop::sell_item(player, catalog, item_id, quantity)
        })
    }

    pub fn craft_item(&self, id: &str, item_id: &str) -> Result<CraftReport> {
        self.with_player(id, |player, catalog| {
            crafting::craft_item(player, catalog, item_id)
        })
    }

    /// Equips an item from the inventory, returning whatever it replaced.
    pub fn equip_item(&self, id: &str, item_id: &str) -> Result<Option<Item>> {
        self.with_player(id, |player, _| loadout::equip_item(player, item_id))
    }

    /// Unequips the item in the named slot (`weapon` or `armor`).
    pub fn unequip_item(&self, id: &str, slot: &str) -> Result<Item> {
        self.with_player(id, |player, _| loadout::unequip_item(player, slot))
    }

    /// Starts fighting a fresh copy of a catalog enemy at full health.
    pub fn start_combat(&self, id: &str, enemy_id: &str) -> Result<Enemy> {
        self.with_player(id, |player, catalog| {
            let enemy = catalog
                .enemy(enemy_id)
                .ok_or_else(|| GameError::enemy_not_found(enemy_id))?
                .snapshot();

            if let Some(previous) = &player.combat.current_enemy {
                debug!(player = %id, enemy = %previous.id, "abandoning current fight");
            }
            player.combat.end_fight();
            player.combat.is_fighting = true;
            player.combat.current_enemy = Some(enemy.clone());
            player.combat.player_health = player.max_health();

            info!(player = %id, enemy = %enemy.id, "combat started");
            Ok(enemy)
        })
    }

    /// Leaves the current fight. Not fighting is not an error.
    pub fn stop_combat(&self, id: &str) -> Result<()> {
        self.with_player(id, |player, _| {
            if player.combat.is_fighting {
                info!(player = %id, "combat stopped");
            }
            player.combat.end_fight();
            Ok(())
        })
    }
}
