//! Elapsed-time catch-up.
//!
//! Brings a player forward from `last_update` to a new instant by running
//! every active gathering skill and any ongoing fight over the whole
//! interval in closed form. Used both for live ticks and for players
//! returning after a long absence.

use super::game_state::PlayerState;
use crate::catalog::Catalog;
use crate::combat::logic::{handle_combat_round, CombatReport};
use crate::skills::gathering::{resolve_gathering, GatheringError, GatheringReport};
use crate::skills::types::{SkillCategory, SkillId};
use rand::Rng;
use tracing::{debug, warn};

/// A gathering skill that could not be advanced this pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillFailure {
    pub skill: SkillId,
    pub error: GatheringError,
}

/// Report of one catch-up pass
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AdvanceReport {
    /// Simulated milliseconds, after clamping and capping
    pub elapsed_ms: u64,
    pub gathering: Vec<GatheringReport>,
    pub combat: Option<CombatReport>,
    pub failures: Vec<SkillFailure>,
    /// Set when a fight flag without an enemy was found and cleared
    pub repaired_combat: bool,
}

impl AdvanceReport {
    /// Skill XP earned by gathering this pass.
    pub fn gathering_xp(&self) -> f64 {
        self.gathering.iter().map(|g| g.xp_gained).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Milliseconds to simulate between `last_update` and `now`.
///
/// A clock that moved backwards yields 0. `max_catch_up_ms` bounds long
/// absences when set.
pub fn catch_up_elapsed(last_update: i64, now: i64, max_catch_up_ms: Option<i64>) -> u64 {
    let elapsed = now.saturating_sub(last_update).max(0);
    let elapsed = match max_catch_up_ms {
        Some(cap) => elapsed.min(cap.max(0)),
        None => elapsed,
    };
    elapsed as u64
}

/// Advances a player to `now`.
///
/// Per-skill failures are logged and recorded in the report without
/// stopping the other skills or combat. `last_update` never moves
/// backwards; when `now` is not after it the player is left untouched.
pub fn advance_player(
    player: &mut PlayerState,
    now: i64,
    catalog: &dyn Catalog,
    max_catch_up_ms: Option<i64>,
    rng: &mut impl Rng,
) -> AdvanceReport {
    let mut report = AdvanceReport {
        elapsed_ms: catch_up_elapsed(player.last_update, now, max_catch_up_ms),
        ..AdvanceReport::default()
    };

    if now <= player.last_update {
        if now < player.last_update {
            debug!(
                player = %player.id,
                last_update = player.last_update,
                now,
                "clock is behind last update, nothing to simulate"
            );
        }
        return report;
    }

    let elapsed_ms = report.elapsed_ms;
    debug!(player = %player.id, elapsed_ms, "advancing player");

    for skill_id in player.active_skills() {
        if skill_id.category() != SkillCategory::Gathering {
            debug!(player = %player.id, skill = %skill_id, "active skill has no idle action, skipping");
            continue;
        }
        match resolve_gathering(player, skill_id, elapsed_ms, catalog, rng) {
            Ok(gathered) => report.gathering.push(gathered),
            Err(error) => {
                warn!(player = %player.id, skill = %skill_id, %error, "gathering pass failed");
                report.failures.push(SkillFailure {
                    skill: skill_id,
                    error,
                });
            }
        }
    }

    if player.combat.is_fighting {
        if player.combat.current_enemy.is_some() {
            match handle_combat_round(player, elapsed_ms, catalog, rng) {
                Ok(combat) => report.combat = Some(combat),
                Err(error) => warn!(player = %player.id, %error, "combat pass failed"),
            }
        } else {
            warn!(player = %player.id, "fighting without an enemy, clearing combat");
            player.combat.end_fight();
            report.repaired_combat = true;
        }
    } else if player.combat.current_enemy.is_some() {
        warn!(player = %player.id, "stale enemy outside of combat, clearing");
        player.combat.end_fight();
        report.repaired_combat = true;
    }

    player.last_update = player.last_update.max(now);
    report
}
