//! Mastery unlock effects and the bonuses they grant to gathering.
//!
//! Unlock tables are content: each skill definition in the catalog lists
//! which mastery level unlocks which effect. The engine only knows how to
//! apply the effect kinds below.

use super::types::MasteryState;
use crate::core::constants::{MAX_LEVEL, MIN_LEVEL};
use crate::items::ItemId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A runtime effect granted by a mastery unlock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryEffect {
    /// Divides the base action time.
    SpeedMultiplier(f64),
    /// Scales the output quantity.
    ResourceMultiplier(f64),
    /// Chance per pass to double the output.
    DoubleOutputChance(f64),
    /// Chance per pass to find one extra item of another kind.
    BonusItemChance { item_id: ItemId, chance: f64 },
}

/// One row of a skill's mastery unlock table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryUnlock {
    pub level: u32,
    pub description: String,
    pub effect: MasteryEffect,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MasteryError {
    #[error("mastery level {0} is outside 1..=99")]
    InvalidLevel(u32),

    #[error("mastery XP {0} is not a finite non-negative number")]
    InvalidXp(f64),

    #[error("multiplier {value} unlocked at level {level} must be finite and positive")]
    InvalidMultiplier { level: u32, value: f64 },

    #[error("chance {value} unlocked at level {level} must be within [0, 1]")]
    InvalidChance { level: u32, value: f64 },
}

/// Bonuses in effect for one gathering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MasteryBonuses {
    pub speed_multiplier: f64,
    pub resource_multiplier: f64,
    pub double_output_chances: Vec<f64>,
    pub bonus_items: Vec<(ItemId, f64)>,
}

impl Default for MasteryBonuses {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            resource_multiplier: 1.0,
            double_output_chances: Vec::new(),
            bonus_items: Vec::new(),
        }
    }
}

impl MasteryBonuses {
    /// Folds every unlock at or below the mastery level into one set of bonuses.
    ///
    /// Multipliers stack multiplicatively; chances stay independent.
    pub fn from_unlocks(
        mastery: &MasteryState,
        unlocks: &[MasteryUnlock],
    ) -> Result<Self, MasteryError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&mastery.level) {
            return Err(MasteryError::InvalidLevel(mastery.level));
        }
        if !mastery.xp.is_finite() || mastery.xp < 0.0 {
            return Err(MasteryError::InvalidXp(mastery.xp));
        }

        let mut bonuses = Self::default();
        for unlock in unlocks.iter().filter(|u| u.level <= mastery.level) {
            match &unlock.effect {
                MasteryEffect::SpeedMultiplier(value) => {
                    bonuses.speed_multiplier *= checked_multiplier(unlock.level, *value)?;
                }
                MasteryEffect::ResourceMultiplier(value) => {
                    bonuses.resource_multiplier *= checked_multiplier(unlock.level, *value)?;
                }
                MasteryEffect::DoubleOutputChance(chance) => {
                    bonuses
                        .double_output_chances
                        .push(checked_chance(unlock.level, *chance)?);
                }
                MasteryEffect::BonusItemChance { item_id, chance } => {
                    bonuses
                        .bonus_items
                        .push((item_id.clone(), checked_chance(unlock.level, *chance)?));
                }
            }
        }
        Ok(bonuses)
    }

    /// Rolls every double-output chance; any success doubles the output once.
    pub fn roll_double_output(&self, rng: &mut impl Rng) -> bool {
        let mut doubled = false;
        for chance in &self.double_output_chances {
            // Every chance is drawn so the number of draws does not depend on earlier results.
            if rng.gen::<f64>() < *chance {
                doubled = true;
            }
        }
        doubled
    }

    /// Rolls every bonus item chance and returns the items found.
    pub fn roll_bonus_items(&self, rng: &mut impl Rng) -> Vec<ItemId> {
        self.bonus_items
            .iter()
            .filter(|(_, chance)| rng.gen::<f64>() < *chance)
            .map(|(item_id, _)| item_id.clone())
            .collect()
    }
}

/// Checks every row of an unlock table, unlocked or not.
pub fn validate_unlocks(unlocks: &[MasteryUnlock]) -> Result<(), MasteryError> {
    for unlock in unlocks {
        match &unlock.effect {
            MasteryEffect::SpeedMultiplier(value) | MasteryEffect::ResourceMultiplier(value) => {
                checked_multiplier(unlock.level, *value)?;
            }
            MasteryEffect::DoubleOutputChance(chance)
            | MasteryEffect::BonusItemChance { chance, .. } => {
                checked_chance(unlock.level, *chance)?;
            }
        }
    }
    Ok(())
}

fn checked_multiplier(level: u32, value: f64) -> Result<f64, MasteryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MasteryError::InvalidMultiplier { level, value })
    }
}

fn checked_chance(level: u32, value: f64) -> Result<f64, MasteryError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(MasteryError::InvalidChance { level, value })
    }
}

/// Builds the player-facing unlock map (threshold -> description).
pub fn unlock_descriptions(unlocks: &[MasteryUnlock]) -> BTreeMap<u32, String> {
    unlocks
        .iter()
        .map(|unlock| (unlock.level, unlock.description.clone()))
        .collect()
}
