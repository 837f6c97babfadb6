// Experience and progression constants
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;
pub const MASTERY_CURVE_BASE: f64 = 150.0;
pub const MASTERY_CURVE_EXPONENT: f64 = 1.8;
pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 99;

/// Share of every skill XP gain that is also credited to that skill's mastery.
pub const MASTERY_XP_SHARE: f64 = 0.1;

// Gathering action times (milliseconds per action)
pub const WOODCUTTING_ACTION_MS: u64 = 3000;
pub const FISHING_ACTION_MS: u64 = 4000;
pub const MINING_ACTION_MS: u64 = 5000;

/// Every full 10 skill levels add one extra item per completed action.
pub const LEVELS_PER_YIELD_BONUS: u32 = 10;

// Combat constants
pub const COMBAT_ROUND_MS: u64 = 2000;
pub const COMBAT_XP_PER_DAMAGE: f64 = 4.0;
pub const HITPOINTS_XP_PER_DAMAGE: f64 = 1.0;
pub const BASE_PLAYER_HEALTH: u32 = 10;
pub const HEALTH_PER_HITPOINTS_LEVEL: u32 = 4;
/// Health the player wakes up with after losing a fight.
pub const DEFEAT_RECOVERY_HEALTH: u32 = 10;
pub const ENEMY_GOLD_MIN: u32 = 5;
/// Exclusive upper bound of the gold reward.
pub const ENEMY_GOLD_MAX: u32 = 10;

// Crafting
pub const CRAFT_XP_PER_RECIPE_LEVEL: f64 = 10.0;

// Economy
pub const STARTING_GOLD: u32 = 50;
pub const GOLD_CAP: u32 = i32::MAX as u32;

// Save system constants
pub const SAVE_VERSION_MAGIC: u64 = 0x534B494C4C424E00; // "SKILLBN\0" in hex

/// Used when the catalog has no definition for a skill.
pub const DEFAULT_XP_PER_ACTION: f64 = 1.0;

// Catch-up
pub const DEFAULT_MAX_CATCH_UP_MS: i64 = 7 * 24 * 60 * 60 * 1000; // 7 days
