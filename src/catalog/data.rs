//! Built-in content set.

use super::{CatalogData, GatheringAction, SkillDefinition};
use crate::combat::Enemy;
use crate::core::constants::{FISHING_ACTION_MS, MINING_ACTION_MS, WOODCUTTING_ACTION_MS};
use crate::items::{EquipmentSlot, Ingredient, Item, ItemStats, Recipe};
use crate::skills::mastery::{MasteryEffect, MasteryUnlock};
use crate::skills::types::SkillId;

pub fn standard_content() -> CatalogData {
    CatalogData {
        items: items(),
        enemies: enemies(),
        recipes: recipes(),
        skills: skills(),
    }
}

fn items() -> Vec<Item> {
    vec![
        Item::resource("logs", "Logs").with_prices(None, Some(1)),
        Item::resource("oak_logs", "Oak Logs").with_prices(None, Some(5)),
        Item::resource("raw_fish", "Raw Fish").with_prices(None, Some(2)),
        Item::resource("cooked_fish", "Cooked Fish").with_prices(None, Some(5)),
        Item::resource("pearl", "Pearl").with_prices(None, Some(30)),
        Item::resource("copper_ore", "Copper Ore").with_prices(Some(6), Some(2)),
        Item::resource("tin_ore", "Tin Ore").with_prices(Some(6), Some(2)),
        Item::resource("uncut_gem", "Uncut Gem").with_prices(None, Some(25)),
        Item::resource("bronze_bar", "Bronze Bar").with_prices(None, Some(8)),
        Item::resource("ashes", "Ashes").with_prices(None, Some(1)),
        Item::resource("feather", "Feather").with_prices(Some(2), Some(1)),
        Item::resource("bones", "Bones").with_prices(None, Some(1)),
        Item::equipment(
            "bronze_sword",
            "Bronze Sword",
            EquipmentSlot::Weapon,
            ItemStats {
                attack_bonus: 4,
                strength_bonus: 3,
                defense_bonus: 0,
            },
        )
        .with_prices(Some(50), Some(20)),
        Item::equipment(
            "iron_sword",
            "Iron Sword",
            EquipmentSlot::Weapon,
            ItemStats {
                attack_bonus: 8,
                strength_bonus: 6,
                defense_bonus: 0,
            },
        )
        .with_prices(Some(200), Some(80)),
        Item::equipment(
            "wooden_shield",
            "Wooden Shield",
            EquipmentSlot::Armor,
            ItemStats {
                defense_bonus: 2,
                ..ItemStats::default()
            },
        )
        .with_prices(Some(20), Some(5)),
        Item::equipment(
            "bronze_armor",
            "Bronze Armor",
            EquipmentSlot::Armor,
            ItemStats {
                defense_bonus: 5,
                ..ItemStats::default()
            },
        )
        .with_prices(Some(80), Some(30)),
    ]
}

fn enemies() -> Vec<Enemy> {
    vec![
        Enemy::new("chicken", "Chicken", 1, 1, 5)
            .with_loot("feather", 5, 1.0)
            .with_loot("bones", 1, 1.0),
        Enemy::new("cow", "Cow", 3, 2, 10).with_loot("bones", 1, 1.0),
        Enemy::new("goblin", "Goblin", 5, 4, 15)
            .with_loot("bones", 1, 1.0)
            .with_loot("copper_ore", 2, 0.3)
            .with_loot("bronze_sword", 1, 0.05),
        Enemy::new("skeleton", "Skeleton", 10, 8, 30)
            .with_loot("bones", 2, 1.0)
            .with_loot("iron_sword", 1, 0.02),
    ]
}

fn recipe(output: &str, skill: SkillId, level: u32, ingredients: &[(&str, u32)]) -> Recipe {
    Recipe {
        output_item: output.to_string(),
        output_quantity: 1,
        skill,
        level,
        ingredients: ingredients
            .iter()
            .map(|(item_id, quantity)| Ingredient {
                item_id: item_id.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

fn recipes() -> Vec<Recipe> {
    vec![
        recipe("ashes", SkillId::Firemaking, 1, &[("logs", 1)]),
        recipe("cooked_fish", SkillId::Cooking, 1, &[("raw_fish", 1)]),
        recipe(
            "bronze_bar",
            SkillId::Smithing,
            1,
            &[("copper_ore", 1), ("tin_ore", 1)],
        ),
        recipe("bronze_sword", SkillId::Smithing, 5, &[("bronze_bar", 2)]),
        recipe("bronze_armor", SkillId::Smithing, 10, &[("bronze_bar", 4)]),
    ]
}

fn unlock(level: u32, description: &str, effect: MasteryEffect) -> MasteryUnlock {
    MasteryUnlock {
        level,
        description: description.to_string(),
        effect,
    }
}

/// Shared shape of the gathering mastery tables; only the flavour differs.
fn gathering_mastery(resource: &str, bonus_item: &str, bonus_name: &str) -> Vec<MasteryUnlock> {
    vec![
        unlock(10, "+10% action speed", MasteryEffect::SpeedMultiplier(1.1)),
        unlock(
            25,
            &format!("10% chance to double {}", resource),
            MasteryEffect::DoubleOutputChance(0.1),
        ),
        unlock(
            50,
            &format!("+25% {}", resource),
            MasteryEffect::ResourceMultiplier(1.25),
        ),
        unlock(
            75,
            &format!("5% chance to find {}", bonus_name),
            MasteryEffect::BonusItemChance {
                item_id: bonus_item.to_string(),
                chance: 0.05,
            },
        ),
        unlock(99, "+25% action speed", MasteryEffect::SpeedMultiplier(1.25)),
    ]
}

fn gathering(
    skill: SkillId,
    xp_per_action: f64,
    base_action_ms: u64,
    output_item: &str,
    mastery_unlocks: Vec<MasteryUnlock>,
) -> SkillDefinition {
    SkillDefinition {
        skill,
        xp_per_action,
        gathering: Some(GatheringAction {
            base_action_ms,
            output_item: output_item.to_string(),
        }),
        mastery_unlocks,
    }
}

fn plain(skill: SkillId, xp_per_action: f64) -> SkillDefinition {
    SkillDefinition {
        skill,
        xp_per_action,
        gathering: None,
        mastery_unlocks: Vec::new(),
    }
}

fn skills() -> Vec<SkillDefinition> {
    vec![
        gathering(
            SkillId::Woodcutting,
            5.0,
            WOODCUTTING_ACTION_MS,
            "logs",
            gathering_mastery("logs", "oak_logs", "oak logs"),
        ),
        gathering(
            SkillId::Fishing,
            6.0,
            FISHING_ACTION_MS,
            "raw_fish",
            gathering_mastery("fish", "pearl", "a pearl"),
        ),
        gathering(
            SkillId::Mining,
            7.0,
            MINING_ACTION_MS,
            "copper_ore",
            gathering_mastery("ore", "uncut_gem", "an uncut gem"),
        ),
        plain(SkillId::Firemaking, 5.0),
        plain(SkillId::Cooking, 5.0),
        plain(SkillId::Smithing, 8.0),
        plain(SkillId::Attack, 4.0),
        plain(SkillId::Strength, 4.0),
        plain(SkillId::Defence, 4.0),
        plain(SkillId::Hitpoints, 4.0),
    ]
}
