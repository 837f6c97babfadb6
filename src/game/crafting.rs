//! Artisan crafting: turning ingredients into a recipe's output.

use crate::catalog::Catalog;
use crate::core::constants::CRAFT_XP_PER_RECIPE_LEVEL;
use crate::core::error::{GameError, Result};
use crate::core::game_state::PlayerState;
use crate::core::leveling::apply_xp;
use crate::items::ItemId;
use crate::skills::types::SkillId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CraftReport {
    pub item_id: ItemId,
    pub quantity: u32,
    pub skill: SkillId,
    pub xp_gained: f64,
    pub levels_gained: u32,
}

/// Crafts one batch of `item_id`.
///
/// Checks the recipe, the skill level and every ingredient before anything
/// is consumed.
pub fn craft_item(
    player: &mut PlayerState,
    catalog: &dyn Catalog,
    item_id: &str,
) -> Result<CraftReport> {
    let recipe = catalog
        .recipe(item_id)
        .ok_or_else(|| GameError::recipe_not_found(item_id))?;
    let output = catalog
        .item(&recipe.output_item)
        .ok_or_else(|| GameError::item_not_found(&recipe.output_item))?;

    let current = player
        .skill(recipe.skill)
        .ok_or_else(|| GameError::skill_not_found(recipe.skill))?
        .level;
    if current < recipe.level {
        return Err(GameError::SkillLevelTooLow {
            skill: recipe.skill,
            required: recipe.level,
            current,
        });
    }

    // A recipe may list the same item on several lines.
    let mut required: BTreeMap<&str, u32> = BTreeMap::new();
    for ingredient in &recipe.ingredients {
        let total = required.entry(ingredient.item_id.as_str()).or_default();
        *total = total.saturating_add(ingredient.quantity);
    }
    for (&ingredient_id, &quantity) in &required {
        let available = player.inventory.quantity(ingredient_id);
        if available < quantity {
            return Err(GameError::MissingIngredients {
                item_id: ingredient_id.to_string(),
                required: quantity,
                available,
            });
        }
    }

    let xp = recipe.level as f64 * CRAFT_XP_PER_RECIPE_LEVEL;
    let skill = player
        .skill_mut(recipe.skill)
        .ok_or_else(|| GameError::skill_not_found(recipe.skill))?;
    let gain = apply_xp(skill, xp);

    for (ingredient_id, quantity) in required {
        player.inventory.remove(ingredient_id, quantity);
    }
    player.inventory.add(output, recipe.output_quantity);

    Ok(CraftReport {
        item_id: output.id.clone(),
        quantity: recipe.output_quantity,
        skill: recipe.skill,
        xp_gained: gain.xp,
        levels_gained: gain.levels_gained,
    })
}
