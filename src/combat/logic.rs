use crate::catalog::Catalog;
use crate::combat::types::Enemy;
use crate::core::constants::*;
use crate::core::game_state::PlayerState;
use crate::core::leveling::apply_xp;
use crate::items::ItemId;
use crate::skills::types::SkillId;
use rand::Rng;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("player is marked as fighting but has no enemy")]
    NoEnemy,

    #[error("player is not fighting")]
    NotFighting,
}

/// How a combat pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Both sides still standing; the fight carries on next pass.
    Ongoing,
    EnemyDefeated,
    PlayerDefeated,
}

/// Everything that happened during one combat pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatReport {
    pub enemy_id: String,
    pub rounds: u64,
    pub player_hits: u64,
    pub enemy_hits: u64,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub outcome: CombatOutcome,
    pub gold_gained: u32,
    pub loot: Vec<(ItemId, u32)>,
}

impl CombatReport {
    fn new(enemy_id: String) -> Self {
        Self {
            enemy_id,
            rounds: 0,
            player_hits: 0,
            enemy_hits: 0,
            damage_dealt: 0,
            damage_taken: 0,
            outcome: CombatOutcome::Ongoing,
            gold_gained: 0,
            loot: Vec::new(),
        }
    }
}

/// Uniform integer in `[0, bound)`; an empty range rolls 0.
fn roll_below(bound: u32, rng: &mut impl Rng) -> u32 {
    if bound == 0 {
        0
    } else {
        rng.gen_range(0..bound)
    }
}

/// Accuracy-then-magnitude attack.
///
/// The attacker hits only when its accuracy roll beats the defender's roll
/// outright; a tie is a miss. A hit always deals at least 1 damage.
pub fn resolve_attack(attack: u32, strength: u32, defense: u32, rng: &mut impl Rng) -> u32 {
    let attack_roll = roll_below(attack, rng);
    let defence_roll = roll_below(defense, rng);
    if attack_roll > defence_roll {
        roll_below(strength, rng).max(1)
    } else {
        0
    }
}

/// An attacker with accuracy below 2 can only ever roll 0 and never hits.
pub fn can_ever_hit(attack: u32) -> bool {
    attack >= 2
}

/// Runs as many fixed-length rounds as `elapsed_ms` (plus any time left
/// over from the previous pass) allows, stopping early when either side
/// falls.
pub fn handle_combat_round(
    player: &mut PlayerState,
    elapsed_ms: u64,
    catalog: &dyn Catalog,
    rng: &mut impl Rng,
) -> Result<CombatReport, CombatError> {
    if !player.combat.is_fighting {
        return Err(CombatError::NotFighting);
    }
    let mut enemy = player.combat.current_enemy.take().ok_or(CombatError::NoEnemy)?;
    let mut report = CombatReport::new(enemy.id.clone());

    let total_ms = elapsed_ms.saturating_add(player.combat.pending_ms);
    let rounds = total_ms / COMBAT_ROUND_MS;
    player.combat.pending_ms = total_ms % COMBAT_ROUND_MS;

    for _ in 0..rounds {
        let player_attack = player.total_attack();
        let player_defense = player.total_defense();
        if !can_ever_hit(player_attack) && !can_ever_hit(enemy.attack) {
            // Nothing can change any more; the remaining rounds are all misses.
            report.rounds = rounds;
            break;
        }
        report.rounds += 1;

        let damage = resolve_attack(player_attack, player.total_strength(), enemy.defense, rng);
        if damage > 0 {
            report.player_hits += 1;
            report.damage_dealt += damage as u64;
            enemy.take_damage(damage);
            grant_combat_xp(player, SkillId::Attack, damage as f64 * COMBAT_XP_PER_DAMAGE);
            grant_combat_xp(player, SkillId::Strength, damage as f64 * COMBAT_XP_PER_DAMAGE);

            if !enemy.is_alive() {
                defeat_enemy(player, &enemy, catalog, rng, &mut report);
                return Ok(report);
            }
        }

        let damage = resolve_attack(enemy.attack, enemy.attack, player_defense, rng);
        if damage > 0 {
            report.enemy_hits += 1;
            report.damage_taken += damage as u64;
            grant_combat_xp(player, SkillId::Defence, damage as f64 * COMBAT_XP_PER_DAMAGE);
            grant_combat_xp(
                player,
                SkillId::Hitpoints,
                damage as f64 * HITPOINTS_XP_PER_DAMAGE,
            );
            player.combat.player_health = player.combat.player_health.saturating_sub(damage);

            if player.combat.player_health == 0 {
                defeat_player(player, &mut report);
                return Ok(report);
            }
        }
    }

    player.combat.current_enemy = Some(enemy);
    Ok(report)
}

fn grant_combat_xp(player: &mut PlayerState, skill: SkillId, amount: f64) {
    if let Some(state) = player.skill_mut(skill) {
        apply_xp(state, amount);
    }
}

/// Rolls loot, pays out gold and ends the fight.
fn defeat_enemy(
    player: &mut PlayerState,
    enemy: &Enemy,
    catalog: &dyn Catalog,
    rng: &mut impl Rng,
    report: &mut CombatReport,
) {
    for entry in &enemy.loot_table {
        if rng.gen::<f64>() >= entry.chance {
            continue;
        }
        match catalog.item(&entry.item_id) {
            Some(template) => {
                player.inventory.add(template, entry.quantity);
                report.loot.push((entry.item_id.clone(), entry.quantity));
            }
            None => warn!(
                enemy = %enemy.id,
                item = %entry.item_id,
                "loot item missing from catalog, skipping drop"
            ),
        }
    }

    let gold = rng.gen_range(ENEMY_GOLD_MIN..ENEMY_GOLD_MAX);
    player.add_gold(gold);
    report.gold_gained = gold;
    report.outcome = CombatOutcome::EnemyDefeated;
    player.combat.end_fight();
}

/// Ends the fight and leaves the player with a small health buffer.
fn defeat_player(player: &mut PlayerState, report: &mut CombatReport) {
    player.combat.end_fight();
    player.combat.player_health = DEFEAT_RECOVERY_HEALTH.min(player.max_health());
    report.outcome = CombatOutcome::PlayerDefeated;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::items::{EquipmentSlot, Item, ItemStats};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighting_player(catalog: &StaticCatalog, enemy: Enemy) -> PlayerState {
        let mut player = PlayerState::new("fighter".to_string(), 0, catalog);
        player.combat.is_fighting = true;
        player.combat.current_enemy = Some(enemy.snapshot());
        player
    }

    fn big_sword() -> Item {
        Item::equipment(
            "test_blade",
            "Test Blade",
            EquipmentSlot::Weapon,
            ItemStats {
                attack_bonus: 1000,
                strength_bonus: 1000,
                defense_bonus: 0,
            },
        )
    }

    #[test]
    fn test_defence_win_deals_zero_damage() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Attack 1 can only roll 0, which never beats any defence roll.
        for _ in 0..1000 {
            assert_eq!(resolve_attack(1, 50, 10, &mut rng), 0);
            assert_eq!(resolve_attack(0, 50, 0, &mut rng), 0);
        }
    }

    #[test]
    fn test_defence_roll_at_or_above_attack_roll_deals_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut zeros = 0;
        let mut hits = 0;
        for _ in 0..5000 {
            let mut replay = rng.clone();
            let attack_roll = replay.gen_range(0..5u32);
            let defence_roll = replay.gen_range(0..50u32);

            let damage = resolve_attack(5, 10, 50, &mut rng);

            if defence_roll >= attack_roll {
                assert_eq!(damage, 0);
                zeros += 1;
            } else {
                assert!((1..10).contains(&damage));
                hits += 1;
            }
        }
        assert!(zeros > 0);
        assert!(hits > 0);
    }

    #[test]
    fn test_hits_deal_at_least_one_and_below_strength() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut hits = 0;
        for _ in 0..2000 {
            let damage = resolve_attack(20, 6, 5, &mut rng);
            if damage > 0 {
                hits += 1;
                assert!((1..6).contains(&damage));
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn test_zero_strength_hit_still_deals_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let damage = resolve_attack(1000, 0, 0, &mut rng);
            // attack roll of 0 against defence 0 is a tie, otherwise a hit for 1
            assert!(damage <= 1);
        }
    }

    #[test]
    fn test_not_fighting_is_an_error() {
        let catalog = StaticCatalog::standard();
        let mut player = PlayerState::new("idle".to_string(), 0, &catalog);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            handle_combat_round(&mut player, 10_000, &catalog, &mut rng),
            Err(CombatError::NotFighting)
        );

        player.combat.is_fighting = true;
        assert_eq!(
            handle_combat_round(&mut player, 10_000, &catalog, &mut rng),
            Err(CombatError::NoEnemy)
        );
    }

    #[test]
    fn test_short_elapsed_carries_over() {
        let catalog = StaticCatalog::standard();
        let enemy = catalog.enemy("cow").unwrap().clone();
        let mut player = fighting_player(&catalog, enemy);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = handle_combat_round(&mut player, 1_500, &catalog, &mut rng).unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(player.combat.pending_ms, 1_500);
        assert!(player.combat.current_enemy.is_some());
    }

    #[test]
    fn test_enemy_defeat_grants_bounded_gold_and_loot() {
        let catalog = StaticCatalog::standard();
        for seed in 0..50 {
            let enemy = catalog.enemy("chicken").unwrap().clone();
            let mut player = fighting_player(&catalog, enemy);
            player.equipment.replace(EquipmentSlot::Weapon, Some(big_sword()));
            let gold_before = player.gold;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let report = handle_combat_round(&mut player, 60_000, &catalog, &mut rng).unwrap();

            assert_eq!(report.outcome, CombatOutcome::EnemyDefeated);
            let gained = player.gold - gold_before;
            assert!((5..10).contains(&gained), "gold gained {}", gained);
            assert_eq!(report.gold_gained, gained);
            assert_eq!(player.inventory.quantity("feather"), 5);
            assert_eq!(player.inventory.quantity("bones"), 1);
            assert!(!player.combat.is_fighting);
            assert!(player.combat.current_enemy.is_none());
        }
    }

    #[test]
    fn test_player_hits_grant_attack_and_strength_xp() {
        let catalog = StaticCatalog::standard();
        let enemy = catalog.enemy("skeleton").unwrap().clone();
        let mut player = fighting_player(&catalog, enemy);
        player.equipment.replace(EquipmentSlot::Weapon, Some(big_sword()));
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let report = handle_combat_round(&mut player, 10_000, &catalog, &mut rng).unwrap();

        let expected = report.damage_dealt as f64 * 4.0;
        assert!(report.damage_dealt > 0);
        assert_eq!(player.skill(SkillId::Attack).unwrap().xp, expected);
        assert_eq!(player.skill(SkillId::Strength).unwrap().xp, expected);
    }

    #[test]
    fn test_player_defeat_resets_health_and_ends_fight() {
        let catalog = StaticCatalog::standard();
        let brute = Enemy::new("brute", "Brute", 10_000, 10_000, 10_000);
        let mut player = fighting_player(&catalog, brute);
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let report = handle_combat_round(&mut player, 600_000, &catalog, &mut rng).unwrap();

        assert_eq!(report.outcome, CombatOutcome::PlayerDefeated);
        assert!(!player.combat.is_fighting);
        assert!(player.combat.current_enemy.is_none());
        assert_eq!(player.combat.player_health, 10);
        assert_eq!(report.gold_gained, 0);
        assert_eq!(player.gold, 50);

        let defence = player.skill(SkillId::Defence).unwrap();
        assert_eq!(defence.xp, report.damage_taken as f64 * 4.0);
        let hitpoints = player.skill(SkillId::Hitpoints).unwrap();
        assert_eq!(hitpoints.xp, report.damage_taken as f64);
    }

    #[test]
    fn test_catalog_enemy_is_never_mutated() {
        let catalog = StaticCatalog::standard();
        let template = catalog.enemy("goblin").unwrap().clone();
        let mut player = fighting_player(&catalog, template.clone());
        player.equipment.replace(EquipmentSlot::Weapon, Some(big_sword()));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        handle_combat_round(&mut player, 60_000, &catalog, &mut rng).unwrap();

        assert_eq!(catalog.enemy("goblin").unwrap(), &template);
        assert_eq!(template.health, template.max_health);
    }

    #[test]
    fn test_stalemate_changes_nothing() {
        let catalog = StaticCatalog::standard();
        let enemy = catalog.enemy("chicken").unwrap().clone();
        let mut player = fighting_player(&catalog, enemy.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let report =
            handle_combat_round(&mut player, 7 * 24 * 3_600_000, &catalog, &mut rng).unwrap();

        assert_eq!(report.outcome, CombatOutcome::Ongoing);
        assert_eq!(report.damage_dealt, 0);
        assert_eq!(report.damage_taken, 0);
        assert_eq!(player.combat.current_enemy.as_ref().unwrap().health, enemy.max_health);
    }
}
