//! Read-only game content: items, enemies, recipes and skill definitions.
//!
//! The engine never reaches for global tables. Everything it needs to know
//! about content comes through a `Catalog` handed to it by the caller.

pub mod data;

use crate::combat::Enemy;
use crate::items::{Item, ItemId, Recipe};
use crate::skills::mastery::MasteryUnlock;
use crate::skills::types::SkillId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::Path;

/// What one gathering action takes and yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatheringAction {
    pub base_action_ms: u64,
    pub output_item: ItemId,
}

/// Static description of a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub skill: SkillId,
    pub xp_per_action: f64,
    /// Present for skills that gather resources over time
    #[serde(default)]
    pub gathering: Option<GatheringAction>,
    /// Mastery unlock table; a skill has mastery exactly when this is non-empty
    #[serde(default)]
    pub mastery_unlocks: Vec<MasteryUnlock>,
}

impl SkillDefinition {
    pub fn has_mastery(&self) -> bool {
        !self.mastery_unlocks.is_empty()
    }
}

/// Read-only content lookups used by the engine.
pub trait Catalog: Send + Sync {
    fn item(&self, item_id: &str) -> Option<&Item>;

    fn enemy(&self, enemy_id: &str) -> Option<&Enemy>;

    /// Recipe that produces `output_item`.
    fn recipe(&self, output_item: &str) -> Option<&Recipe>;

    fn skill(&self, skill: SkillId) -> Option<&SkillDefinition>;

    /// Mastery unlock table for a skill (empty when it has none).
    fn mastery_unlocks(&self, skill: SkillId) -> &[MasteryUnlock] {
        self.skill(skill)
            .map(|definition| definition.mastery_unlocks.as_slice())
            .unwrap_or(&[])
    }
}

/// Serialized content file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

/// In-memory catalog built from `CatalogData`.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: HashMap<ItemId, Item>,
    enemies: HashMap<String, Enemy>,
    recipes: HashMap<ItemId, Recipe>,
    skills: BTreeMap<SkillId, SkillDefinition>,
}

impl StaticCatalog {
    /// The built-in content set.
    pub fn standard() -> Self {
        Self::from_data(data::standard_content())
    }

    pub fn from_data(data: CatalogData) -> Self {
        Self {
            items: data
                .items
                .into_iter()
                .map(|item| (item.id.clone(), item.stack(1)))
                .collect(),
            enemies: data
                .enemies
                .into_iter()
                .map(|enemy| (enemy.id.clone(), enemy.snapshot()))
                .collect(),
            recipes: data
                .recipes
                .into_iter()
                .map(|recipe| (recipe.output_item.clone(), recipe))
                .collect(),
            skills: data
                .skills
                .into_iter()
                .map(|definition| (definition.skill, definition))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<CatalogData>(json).map(Self::from_data)
    }

    /// Loads a content file from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }
}

impl Catalog for StaticCatalog {
    fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.get(item_id)
    }

    fn enemy(&self, enemy_id: &str) -> Option<&Enemy> {
        self.enemies.get(enemy_id)
    }

    fn recipe(&self, output_item: &str) -> Option<&Recipe> {
        self.recipes.get(output_item)
    }

    fn skill(&self, skill: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_defines_every_skill() {
        let catalog = StaticCatalog::standard();
        for skill in SkillId::ALL {
            let definition = catalog.skill(skill).expect("skill definition");
            assert!(definition.xp_per_action > 0.0);
        }
    }

    #[test]
    fn test_gathering_outputs_exist() {
        let catalog = StaticCatalog::standard();
        for skill in [SkillId::Woodcutting, SkillId::Fishing, SkillId::Mining] {
            let gathering = catalog
                .skill(skill)
                .and_then(|d| d.gathering.clone())
                .expect("gathering skill");
            assert!(catalog.item(&gathering.output_item).is_some());
        }
    }

    #[test]
    fn test_recipe_ingredients_and_loot_exist() {
        let catalog = StaticCatalog::standard();
        for item in catalog.items() {
            if let Some(recipe) = catalog.recipe(&item.id) {
                for ingredient in &recipe.ingredients {
                    assert!(catalog.item(&ingredient.item_id).is_some());
                }
            }
        }
        for enemy in catalog.enemies() {
            for entry in &enemy.loot_table {
                assert!(catalog.item(&entry.item_id).is_some(), "{}", entry.item_id);
                assert!((0.0..=1.0).contains(&entry.chance));
            }
        }
    }

    #[test]
    fn test_json_round_trip_preserves_content() {
        let json = serde_json::to_string(&data::standard_content()).unwrap();
        let catalog = StaticCatalog::from_json(&json).unwrap();
        let sword = catalog.item("bronze_sword").unwrap();
        assert_eq!(sword.buy_price, Some(50));
        assert_eq!(sword.sell_price, Some(20));
        assert!(catalog.enemy("goblin").is_some());
    }

    #[test]
    fn test_empty_catalog_has_no_mastery() {
        let catalog = StaticCatalog::default();
        assert!(catalog.mastery_unlocks(SkillId::Woodcutting).is_empty());
    }
}
