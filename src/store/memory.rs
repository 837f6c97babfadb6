use super::{PlayerStore, Result, StoreError};
use crate::core::game_state::PlayerState;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory implementation of `PlayerStore`
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<HashMap<String, PlayerState>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.read().map(|players| players.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn get(&self, id: &str) -> Result<Option<PlayerState>> {
        let players = self.players.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(players.get(id).cloned())
    }

    fn save(&self, player: &PlayerState) -> Result<()> {
        let mut players = self.players.write().map_err(|_| StoreError::LockPoisoned)?;
        players.insert(player.id.clone(), player.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut players = self.players.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(players.remove(id).is_some())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let players = self.players.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut ids: Vec<String> = players.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
