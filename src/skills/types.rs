//! Skill data structures.

use crate::core::constants::MIN_LEVEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Every skill a player can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    Woodcutting,
    Fishing,
    Mining,
    Firemaking,
    Cooking,
    Smithing,
    Attack,
    Strength,
    Defence,
    Hitpoints,
}

/// How a skill is trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    /// Trained passively over time and produces resources.
    Gathering,
    /// Trained by crafting recipes.
    Artisan,
    /// Trained by fighting. Never toggled active.
    Combat,
}

impl SkillId {
    /// All skills in display order
    pub const ALL: [SkillId; 10] = [
        SkillId::Woodcutting,
        SkillId::Fishing,
        SkillId::Mining,
        SkillId::Firemaking,
        SkillId::Cooking,
        SkillId::Smithing,
        SkillId::Attack,
        SkillId::Strength,
        SkillId::Defence,
        SkillId::Hitpoints,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SkillId::Woodcutting => "Woodcutting",
            SkillId::Fishing => "Fishing",
            SkillId::Mining => "Mining",
            SkillId::Firemaking => "Firemaking",
            SkillId::Cooking => "Cooking",
            SkillId::Smithing => "Smithing",
            SkillId::Attack => "Attack",
            SkillId::Strength => "Strength",
            SkillId::Defence => "Defence",
            SkillId::Hitpoints => "Hitpoints",
        }
    }

    /// Stable lowercase key, matching the serialized form.
    pub fn key(&self) -> &'static str {
        match self {
            SkillId::Woodcutting => "woodcutting",
            SkillId::Fishing => "fishing",
            SkillId::Mining => "mining",
            SkillId::Firemaking => "firemaking",
            SkillId::Cooking => "cooking",
            SkillId::Smithing => "smithing",
            SkillId::Attack => "attack",
            SkillId::Strength => "strength",
            SkillId::Defence => "defence",
            SkillId::Hitpoints => "hitpoints",
        }
    }

    pub fn category(&self) -> SkillCategory {
        match self {
            SkillId::Woodcutting | SkillId::Fishing | SkillId::Mining => SkillCategory::Gathering,
            SkillId::Firemaking | SkillId::Cooking | SkillId::Smithing => SkillCategory::Artisan,
            SkillId::Attack | SkillId::Strength | SkillId::Defence | SkillId::Hitpoints => {
                SkillCategory::Combat
            }
        }
    }

    pub fn is_combat(&self) -> bool {
        self.category() == SkillCategory::Combat
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SkillId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SkillId::ALL
            .iter()
            .copied()
            .find(|skill| skill.key() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Secondary progression track attached to a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryState {
    pub level: u32,
    /// Total mastery XP ever earned
    pub xp: f64,
    /// Unlock threshold level -> effect description
    pub unlocks: BTreeMap<u32, String>,
}

impl MasteryState {
    pub fn new(unlocks: BTreeMap<u32, String>) -> Self {
        Self {
            level: MIN_LEVEL,
            xp: 0.0,
            unlocks,
        }
    }

    /// Descriptions of every effect unlocked at the current level.
    pub fn unlocked(&self) -> impl Iterator<Item = (&u32, &String)> {
        self.unlocks.range(..=self.level)
    }
}

/// A player's progress in one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillState {
    pub id: SkillId,
    pub name: String,
    pub level: u32,
    /// Total XP ever earned; compared against cumulative level thresholds
    pub xp: f64,
    pub xp_per_action: f64,
    pub is_active: bool,
    pub mastery: Option<MasteryState>,
    /// Time already spent toward the next unfinished gathering action
    #[serde(default)]
    pub action_progress_ms: u64,
}

impl SkillState {
    pub fn new(id: SkillId, xp_per_action: f64) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            level: MIN_LEVEL,
            xp: 0.0,
            xp_per_action,
            is_active: false,
            mastery: None,
            action_progress_ms: 0,
        }
    }

    pub fn with_mastery(mut self, mastery: MasteryState) -> Self {
        self.mastery = Some(mastery);
        self
    }

    pub fn has_mastery(&self) -> bool {
        self.mastery.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_id_parse_round_trip() {
        for skill in SkillId::ALL {
            assert_eq!(skill.key().parse::<SkillId>(), Ok(skill));
        }
        assert_eq!("  Mining ".parse::<SkillId>(), Ok(SkillId::Mining));
        assert!("runecrafting".parse::<SkillId>().is_err());
    }

    #[test]
    fn test_skill_categories() {
        assert_eq!(SkillId::Woodcutting.category(), SkillCategory::Gathering);
        assert_eq!(SkillId::Smithing.category(), SkillCategory::Artisan);
        assert!(SkillId::Hitpoints.is_combat());
        assert!(!SkillId::Fishing.is_combat());
    }

    #[test]
    fn test_skill_id_serializes_as_key() {
        let json = serde_json::to_string(&SkillId::Defence).unwrap();
        assert_eq!(json, "\"defence\"");
    }

    #[test]
    fn test_mastery_unlocked_respects_level() {
        let mut unlocks = BTreeMap::new();
        unlocks.insert(1, "first".to_string());
        unlocks.insert(10, "second".to_string());
        let mut mastery = MasteryState::new(unlocks);

        assert_eq!(mastery.unlocked().count(), 1);
        mastery.level = 10;
        assert_eq!(mastery.unlocked().count(), 2);
    }

    #[test]
    fn test_new_skill_starts_at_level_one() {
        let skill = SkillState::new(SkillId::Fishing, 6.0);
        assert_eq!(skill.level, 1);
        assert_eq!(skill.xp, 0.0);
        assert!(!skill.is_active);
        assert!(!skill.has_mastery());
    }
}
