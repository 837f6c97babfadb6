//! Gathering resolver: turns elapsed time into XP and resources.
//!
//! The yield is computed in closed form, so resolving a week of absence
//! costs the same as resolving one second.

use super::mastery::{validate_unlocks, MasteryBonuses, MasteryError, MasteryEffect};
use super::types::SkillId;
use crate::catalog::Catalog;
use crate::core::constants::LEVELS_PER_YIELD_BONUS;
use crate::core::game_state::PlayerState;
use crate::core::leveling::apply_xp;
use crate::items::ItemId;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatheringError {
    #[error("{0} is not a gathering skill")]
    NotGathering(SkillId),

    #[error("player has no {0} skill")]
    MissingSkill(SkillId),

    #[error("item {0} is not in the catalog")]
    UnknownItem(ItemId),

    #[error("base action time of {0} must be positive")]
    InvalidActionTime(SkillId),

    #[error(transparent)]
    Mastery(#[from] MasteryError),
}

/// What one gathering pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GatheringReport {
    pub skill: SkillId,
    pub xp_gained: f64,
    pub levels_gained: u32,
    pub mastery_xp_gained: f64,
    pub mastery_levels_gained: u32,
    pub actions_completed: u64,
    pub output_item: ItemId,
    pub quantity: u32,
    pub doubled: bool,
    pub bonus_items: Vec<ItemId>,
}

/// XP per elapsed second for a gathering skill at a level.
pub fn xp_rate_per_second(xp_per_action: f64, level: u32) -> f64 {
    xp_per_action * (level.max(1) as f64 / 10.0 + 1.0)
}

/// Items produced per completed action at a level.
pub fn yield_per_action(level: u32) -> u64 {
    1 + (level / LEVELS_PER_YIELD_BONUS) as u64
}

/// Advances one gathering skill by `elapsed_ms`.
///
/// Everything that can fail is checked before the player is touched, so an
/// error leaves the player exactly as it was.
pub fn resolve_gathering(
    player: &mut PlayerState,
    skill_id: SkillId,
    elapsed_ms: u64,
    catalog: &dyn Catalog,
    rng: &mut impl Rng,
) -> Result<GatheringReport, GatheringError> {
    let definition = catalog
        .skill(skill_id)
        .ok_or(GatheringError::NotGathering(skill_id))?;
    let action = definition
        .gathering
        .as_ref()
        .ok_or(GatheringError::NotGathering(skill_id))?;
    if action.base_action_ms == 0 {
        return Err(GatheringError::InvalidActionTime(skill_id));
    }
    let output = catalog
        .item(&action.output_item)
        .ok_or_else(|| GatheringError::UnknownItem(action.output_item.clone()))?;

    let unlocks = definition.mastery_unlocks.as_slice();
    validate_unlocks(unlocks)?;
    for unlock in unlocks {
        if let MasteryEffect::BonusItemChance { item_id, .. } = &unlock.effect {
            if catalog.item(item_id).is_none() {
                return Err(GatheringError::UnknownItem(item_id.clone()));
            }
        }
    }

    let skill = player
        .skill(skill_id)
        .ok_or(GatheringError::MissingSkill(skill_id))?;
    if let Some(mastery) = &skill.mastery {
        MasteryBonuses::from_unlocks(mastery, unlocks)?;
    }

    // Validation done; from here on the pass always completes.
    let skill = player
        .skill_mut(skill_id)
        .ok_or(GatheringError::MissingSkill(skill_id))?;

    let xp_gained = xp_rate_per_second(skill.xp_per_action, skill.level) * (elapsed_ms as f64 / 1000.0);
    let gain = apply_xp(skill, xp_gained);

    let bonuses = match &skill.mastery {
        Some(mastery) => MasteryBonuses::from_unlocks(mastery, unlocks)?,
        None => MasteryBonuses::default(),
    };

    let effective_action_ms = action.base_action_ms as f64 / bonuses.speed_multiplier;
    let total_ms = elapsed_ms.saturating_add(skill.action_progress_ms);
    let batches = (total_ms as f64 / effective_action_ms).floor() as u64;
    let spent_ms = batches as f64 * effective_action_ms;
    skill.action_progress_ms = (total_ms as f64 - spent_ms).max(0.0) as u64;

    let actions_completed = batches.saturating_mul(yield_per_action(skill.level));
    let mut quantity = (actions_completed as f64 * bonuses.resource_multiplier).floor() as u64;

    let mut doubled = false;
    let mut bonus_items = Vec::new();
    if quantity > 0 {
        doubled = bonuses.roll_double_output(rng);
        if doubled {
            quantity = quantity.saturating_mul(2);
        }
        bonus_items = bonuses.roll_bonus_items(rng);
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

    player.inventory.add(output, quantity);
    for item_id in &bonus_items {
        if let Some(template) = catalog.item(item_id) {
            player.inventory.add(template, 1);
        }
    }

    Ok(GatheringReport {
        skill: skill_id,
        xp_gained: gain.xp,
        levels_gained: gain.levels_gained,
        mastery_xp_gained: gain.mastery_xp,
        mastery_levels_gained: gain.mastery_levels_gained,
        actions_completed,
        output_item: output.id.clone(),
        quantity,
        doubled,
        bonus_items,
    })
}
