use super::constants::*;
use crate::catalog::Catalog;
use crate::combat::types::{max_player_health, CombatState};
use crate::items::equipment::Equipment;
use crate::items::inventory::Inventory;
use crate::skills::mastery::unlock_descriptions;
use crate::skills::types::{MasteryState, SkillId, SkillState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state of one player. This is the single canonical
/// representation used by the engine, the stores and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub gold: u32,
    /// Unix milliseconds of the last simulated instant
    pub last_update: i64,
    pub skills: BTreeMap<SkillId, SkillState>,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub combat: CombatState,
}

impl PlayerState {
    /// Creates a fresh player with every skill at level 1 and starting gold.
    pub fn new(id: String, current_time: i64, catalog: &dyn Catalog) -> Self {
        let skills = SkillId::ALL
            .iter()
            .map(|&skill| (skill, new_skill(skill, catalog)))
            .collect();

        Self {
            id,
            gold: STARTING_GOLD,
            last_update: current_time,
            skills,
            inventory: Inventory::new(),
            equipment: Equipment::new(),
            combat: CombatState::new(max_player_health(MIN_LEVEL)),
        }
    }

    pub fn skill(&self, skill: SkillId) -> Option<&SkillState> {
        self.skills.get(&skill)
    }

    pub fn skill_mut(&mut self, skill: SkillId) -> Option<&mut SkillState> {
        self.skills.get_mut(&skill)
    }

    /// Level of a skill, treating a missing skill as level 1.
    pub fn skill_level(&self, skill: SkillId) -> u32 {
        self.skill(skill).map_or(MIN_LEVEL, |s| s.level)
    }

    /// Credits gold, saturating at `GOLD_CAP`.
    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount).min(GOLD_CAP);
    }

    /// Attack level plus weapon accuracy bonus.
    pub fn total_attack(&self) -> u32 {
        self.skill_level(SkillId::Attack) + self.equipment.weapon_stats().attack_bonus
    }

    /// Strength level plus weapon strength bonus.
    pub fn total_strength(&self) -> u32 {
        self.skill_level(SkillId::Strength) + self.equipment.weapon_stats().strength_bonus
    }

    /// Defence level plus armor defense bonus.
    pub fn total_defense(&self) -> u32 {
        self.skill_level(SkillId::Defence) + self.equipment.armor_stats().defense_bonus
    }

    pub fn max_health(&self) -> u32 {
        max_player_health(self.skill_level(SkillId::Hitpoints))
    }

    /// Skills currently training in the background.
    pub fn active_skills(&self) -> Vec<SkillId> {
        self.skills
            .values()
            .filter(|skill| skill.is_active)
            .map(|skill| skill.id)
            .collect()
    }
}

fn new_skill(skill: SkillId, catalog: &dyn Catalog) -> SkillState {
    let Some(definition) = catalog.skill(skill) else {
        return SkillState::new(skill, DEFAULT_XP_PER_ACTION);
    };

    let state = SkillState::new(skill, definition.xp_per_action);
    if definition.has_mastery() {
        state.with_mastery(MasteryState::new(unlock_descriptions(
            &definition.mastery_unlocks,
        )))
    } else {
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::items::{EquipmentSlot, Item, ItemStats};

    fn new_player() -> PlayerState {
        PlayerState::new("hero".to_string(), 1_000, &StaticCatalog::standard())
    }

    #[test]
    fn test_new_player_has_starting_values() {
        let player = new_player();
        assert_eq!(player.id, "hero");
        assert_eq!(player.gold, 50);
        assert_eq!(player.last_update, 1_000);
        assert!(player.inventory.is_empty());
        assert!(player.equipment.iter_equipped().next().is_none());
        assert!(!player.combat.is_fighting);
        assert_eq!(player.combat.player_health, player.max_health());
    }

    #[test]
    fn test_new_player_has_all_ten_skills_at_level_one() {
        let player = new_player();
        assert_eq!(player.skills.len(), 10);
        for skill in player.skills.values() {
            assert_eq!(skill.level, 1);
            assert_eq!(skill.xp, 0.0);
            assert!(!skill.is_active);
        }
    }

    #[test]
    fn test_only_gathering_skills_have_mastery() {
        let player = new_player();
        assert!(player.skill(SkillId::Woodcutting).unwrap().has_mastery());
        assert!(player.skill(SkillId::Mining).unwrap().has_mastery());
        assert!(!player.skill(SkillId::Smithing).unwrap().has_mastery());
        assert!(!player.skill(SkillId::Attack).unwrap().has_mastery());

        let mastery = player.skill(SkillId::Fishing).unwrap().mastery.as_ref().unwrap();
        assert_eq!(mastery.unlocks.len(), 5);
    }

    #[test]
    fn test_missing_definitions_fall_back_to_plain_skills() {
        let player = PlayerState::new("bare".to_string(), 0, &StaticCatalog::default());
        let skill = player.skill(SkillId::Woodcutting).unwrap();
        assert!(!skill.has_mastery());
        assert_eq!(skill.xp_per_action, DEFAULT_XP_PER_ACTION);
    }

    #[test]
    fn test_gold_saturates_at_cap() {
        let mut player = new_player();
        player.add_gold(u32::MAX);
        assert_eq!(player.gold, GOLD_CAP);
        player.add_gold(1);
        assert_eq!(player.gold, GOLD_CAP);
    }

    #[test]
    fn test_totals_include_equipment() {
        let mut player = new_player();
        assert_eq!(player.total_attack(), 1);
        assert_eq!(player.total_strength(), 1);
        assert_eq!(player.total_defense(), 1);

        player.equipment.replace(
            EquipmentSlot::Weapon,
            Some(Item::equipment(
                "bronze_sword",
                "Bronze Sword",
                EquipmentSlot::Weapon,
                ItemStats {
                    attack_bonus: 4,
                    strength_bonus: 3,
                    defense_bonus: 9,
                },
            )),
        );

        assert_eq!(player.total_attack(), 5);
        assert_eq!(player.total_strength(), 4);
        // weapon defense bonus does not count, only armor does
        assert_eq!(player.total_defense(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut player = new_player();
        player.skill_mut(SkillId::Fishing).unwrap().is_active = true;
        let json = serde_json::to_string(&player).unwrap();
        let loaded: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, player);
        assert_eq!(loaded.active_skills(), vec![SkillId::Fishing]);
    }
}
