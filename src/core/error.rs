//! Errors surfaced by player commands.

use crate::items::ItemId;
use crate::skills::types::SkillId;
use crate::store::StoreError;
use thiserror::Error;

/// Failures of a single command. A command that returns one of these has
/// not changed the player at all.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("player already exists: {0}")]
    PlayerExists(String),

    #[error("not enough gold: need {required}, have {available}")]
    InsufficientGold { required: u64, available: u32 },

    #[error("not enough {item_id}: need {required}, have {available}")]
    InsufficientItems {
        item_id: ItemId,
        required: u32,
        available: u32,
    },

    #[error("{0} cannot be sold")]
    NotSellable(ItemId),

    #[error("{0} cannot be bought")]
    NotBuyable(ItemId),

    #[error("{0} cannot be equipped")]
    ItemNotEquippable(ItemId),

    #[error("{0} is not in the inventory")]
    ItemNotInInventory(ItemId),

    #[error("{skill} level {required} required, have {current}")]
    SkillLevelTooLow {
        skill: SkillId,
        required: u32,
        current: u32,
    },

    #[error("missing ingredient {item_id}: need {required}, have {available}")]
    MissingIngredients {
        item_id: ItemId,
        required: u32,
        available: u32,
    },

    #[error("invalid equipment slot: {0}")]
    InvalidEquipmentSlot(String),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("{0} is trained by fighting and cannot be started or stopped")]
    NotIdleSkill(SkillId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    pub fn player_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "player",
            id: id.to_string(),
        }
    }

    pub fn skill_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            what: "skill",
            id: id.to_string(),
        }
    }

    pub fn item_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "item",
            id: id.to_string(),
        }
    }

    pub fn enemy_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "enemy",
            id: id.to_string(),
        }
    }

    pub fn recipe_not_found(id: &str) -> Self {
        Self::NotFound {
            what: "recipe",
            id: id.to_string(),
        }
    }

    /// True for any of the not-found cases.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
