//! Leveling curves and XP application.
//!
//! XP is cumulative: a skill's `xp` is everything it has ever earned and is
//! compared against the cumulative threshold of the next level. Nothing is
//! subtracted on level-up.

use super::constants::*;
use crate::skills::types::{MasteryState, SkillState};

/// The two level curves in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpCurve {
    /// `floor(100 * (L-1)^1.5)`
    Skill,
    /// `floor(150 * L^1.8)`, steeper
    Mastery,
}

impl XpCurve {
    /// Cumulative XP needed to reach `level`.
    pub fn threshold(&self, level: u32) -> u64 {
        match self {
            XpCurve::Skill => xp_to_reach_level(level),
            XpCurve::Mastery => mastery_xp_to_reach_level(level),
        }
    }
}

/// Cumulative XP needed to reach a skill level. Levels 1 and below need none.
pub fn xp_to_reach_level(level: u32) -> u64 {
    if level <= MIN_LEVEL {
        return 0;
    }
    (XP_CURVE_BASE * f64::powf((level - 1) as f64, XP_CURVE_EXPONENT)) as u64
}

/// Cumulative XP needed to reach a mastery level. Level 1 is free.
pub fn mastery_xp_to_reach_level(level: u32) -> u64 {
    if level <= MIN_LEVEL {
        return 0;
    }
    (MASTERY_CURVE_BASE * f64::powf(level as f64, MASTERY_CURVE_EXPONENT)) as u64
}

/// The unique level implied by a cumulative XP total.
pub fn level_for_xp(curve: XpCurve, xp: f64) -> u32 {
    let mut level = MIN_LEVEL;
    while level < MAX_LEVEL && xp >= curve.threshold(level + 1) as f64 {
        level += 1;
    }
    level
}

/// Fraction of the way from the current level to the next, for display only.
///
/// Always 1.0 at the level cap.
pub fn level_progress(curve: XpCurve, xp: f64, level: u32) -> f64 {
    if level >= MAX_LEVEL {
        return 1.0;
    }
    let floor = curve.threshold(level) as f64;
    let ceiling = curve.threshold(level + 1) as f64;
    if ceiling <= floor {
        return 0.0;
    }
    ((xp - floor) / (ceiling - floor)).clamp(0.0, 1.0)
}

/// Adds XP to a `(level, xp)` pair and returns how many levels were gained.
///
/// Amounts that are negative or not finite are ignored. The loop stops at
/// `MAX_LEVEL` no matter how much XP is banked.
pub fn apply_xp_on_curve(curve: XpCurve, level: &mut u32, xp: &mut f64, amount: f64) -> u32 {
    if amount.is_finite() && amount > 0.0 {
        *xp += amount;
    }

    let start = *level;
    *level = (*level).clamp(MIN_LEVEL, MAX_LEVEL);
    while *level < MAX_LEVEL && *xp >= curve.threshold(*level + 1) as f64 {
        *level += 1;
    }
    level.saturating_sub(start)
}

/// What a single XP grant did to a skill.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct XpGain {
    pub xp: f64,
    pub levels_gained: u32,
    pub mastery_xp: f64,
    pub mastery_levels_gained: u32,
}

/// Credits XP to a skill and, when it has mastery, 10% of it to mastery.
pub fn apply_xp(skill: &mut SkillState, amount: f64) -> XpGain {
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    let levels_gained = apply_xp_on_curve(XpCurve::Skill, &mut skill.level, &mut skill.xp, amount);

    let mut gain = XpGain {
        xp: amount,
        levels_gained,
        ..XpGain::default()
    };

    if let Some(mastery) = skill.mastery.as_mut() {
        let mastery_xp = amount * MASTERY_XP_SHARE;
        gain.mastery_xp = mastery_xp;
        gain.mastery_levels_gained = apply_mastery_xp(mastery, mastery_xp);
    }

    gain
}

/// Adds XP directly to a mastery track.
pub fn apply_mastery_xp(mastery: &mut MasteryState, amount: f64) -> u32 {
    apply_xp_on_curve(XpCurve::Mastery, &mut mastery.level, &mut mastery.xp, amount)
}
