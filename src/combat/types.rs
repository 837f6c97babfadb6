use serde::{Deserialize, Serialize};

use crate::core::constants::*;
use crate::items::ItemId;

/// One independent drop chance on an enemy's loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: ItemId,
    pub quantity: u32,
    /// Probability in [0, 1]
    pub chance: f64,
}

/// An enemy. The catalog holds templates; a fight always works on its own
/// clone so damage never reaches the shared catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub max_health: u32,
    #[serde(default)]
    pub loot_table: Vec<LootEntry>,
}

impl Enemy {
    pub fn new(id: &str, name: &str, attack: u32, defense: u32, max_health: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            attack,
            defense,
            health: max_health,
            max_health,
            loot_table: Vec::new(),
        }
    }

    pub fn with_loot(mut self, item_id: &str, quantity: u32, chance: f64) -> Self {
        self.loot_table.push(LootEntry {
            item_id: item_id.to_string(),
            quantity,
            chance,
        });
        self
    }

    /// A fresh, fully healed copy for a new fight.
    pub fn snapshot(&self) -> Self {
        Self {
            health: self.max_health,
            ..self.clone()
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Player combat state. Fighting is encoded by `is_fighting` together with
/// the presence of `current_enemy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub is_fighting: bool,
    pub current_enemy: Option<Enemy>,
    /// Live health pool, separate from Hitpoints XP
    pub player_health: u32,
    /// Simulated time that has not yet filled a whole combat round
    #[serde(default)]
    pub pending_ms: u64,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(max_player_health(MIN_LEVEL))
    }
}

impl CombatState {
    pub fn new(player_health: u32) -> Self {
        Self {
            is_fighting: false,
            current_enemy: None,
            player_health,
            pending_ms: 0,
        }
    }

    /// Ends the current fight, whatever its outcome.
    pub fn end_fight(&mut self) {
        self.is_fighting = false;
        self.current_enemy = None;
        self.pending_ms = 0;
    }
}

/// Maximum player health for a Hitpoints level.
pub fn max_player_health(hitpoints_level: u32) -> u32 {
    BASE_PLAYER_HEALTH + hitpoints_level.saturating_mul(HEALTH_PER_HITPOINTS_LEVEL)
}
