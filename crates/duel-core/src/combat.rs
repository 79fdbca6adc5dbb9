//! Combat model: stat math shared by both fighters.
//!
//! Everything here is a function of a [`FighterStats`] block and the
//! [`CombatTunables`]; nothing depends on who controls the fighter.
//!
//! | Quantity        | Formula                                                   |
//! |-----------------|-----------------------------------------------------------|
//! | base damage     | `base_weapon_damage + strength * strength_multiplier`     |
//! | crit chance     | `agility * crit_multiplier / 100` (**not** capped)        |
//! | attack cooldown | `max(min_cooldown, base_cooldown - agility * factor)`     |
//! | dodge chance    | `min(0.5, agility * dodge_multiplier / 100)`              |
//! | move speed      | `base_move_speed + agility * agility_speed_factor`        |
//! | mitigated hit   | `max(1, round(raw - defense * defense_multiplier))`       |
//!
//! The crit chance is not capped: above 1.0 every roll is a critical. This is
//! a known balance problem of the stock builds.
//!
//! # Example
//!
//! ```
//! use duel_core::combat::{self, HitOutcome, Vitals};
//! use duel_core::config::CombatTunables;
//! use duel_core::fighter::FighterStats;
//! use duel_core::rng::ScriptedRandom;
//!
//! let tunables = CombatTunables::default();
//! let attacker = FighterStats::new(20, 0, 0, 100);
//! let mut rng = ScriptedRandom::constant(0.99);
//!
//! let roll = combat::compute_damage(&attacker, &tunables, &mut rng);
//! assert_eq!(roll.amount, 26);
//!
//! let mut defender = Vitals::new(FighterStats::new(0, 0, 0, 100));
//! let outcome = combat::resolve_hit(&mut defender, roll.amount, &tunables, &mut rng);
//! assert_eq!(outcome, HitOutcome::Landed { damage: 26, died: false });
//! assert_eq!(defender.stats.current_health, 74);
//! ```

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};

use crate::config::CombatTunables;
use crate::fighter::FighterStats;
use crate::rng::RandomSource;
use crate::time::Millis;

/// Result of a damage roll.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Rounded damage before the defender's defense
    pub amount: u64,
    /// Whether the crit roll succeeded
    pub critical: bool,
}

impl DamageRoll {
    /// A roll with a fixed amount and no critical.
    #[must_use]
    pub const fn plain(amount: u64) -> Self {
        Self {
            amount,
            critical: false,
        }
    }
}

/// What happened when a hit was offered to a defender.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// The defender is dead or inside its invulnerability window; nothing changed
    Refused,
    /// The defender dodged; nothing changed
    Dodged,
    /// The hit connected
    Landed {
        /// Damage after defense, at least 1
        damage: u64,
        /// Whether this hit brought health to zero
        died: bool,
    },
}

impl HitOutcome {
    /// Returns `true` only for [`HitOutcome::Landed`].
    #[must_use]
    pub const fn landed(self) -> bool {
        matches!(self, Self::Landed { .. })
    }
}

/// The part of a fighter that combat resolution mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Stats, including current health
    pub stats: FighterStats,
    /// Cleared for the invulnerability window after a landed hit
    pub can_take_hit: bool,
    /// Terminal for the round once set
    pub is_dead: bool,
}

impl Vitals {
    /// Live, vulnerable vitals with the given stats.
    #[must_use]
    pub const fn new(stats: FighterStats) -> Self {
        Self {
            stats,
            can_take_hit: true,
            is_dead: false,
        }
    }
}

/// Weapon damage before crits and defense.
#[must_use]
pub fn base_damage(attacker: &FighterStats, tunables: &CombatTunables) -> f64 {
    tunables.base_weapon_damage + attacker.strength as f64 * tunables.strength_multiplier
}

/// Probability of a critical hit. Can exceed 1.0.
#[must_use]
pub fn crit_chance(attacker: &FighterStats, tunables: &CombatTunables) -> f64 {
    attacker.agility as f64 * tunables.crit_multiplier / 100.0
}

/// Rolls the damage of one attack. Consumes exactly one draw.
pub fn compute_damage(
    attacker: &FighterStats,
    tunables: &CombatTunables,
    rng: &mut dyn RandomSource,
) -> DamageRoll {
    let base = base_damage(attacker, tunables);
    let critical = rng.chance(crit_chance(attacker, tunables));
    let damage = if critical {
        base * tunables.crit_damage
    } else {
        base
    };
    DamageRoll {
        amount: damage.round() as u64,
        critical,
    }
}

/// Minimum time between two attacks of this fighter.
#[must_use]
pub fn attack_cooldown(attacker: &FighterStats, tunables: &CombatTunables) -> Millis {
    let reduced = tunables.base_attack_cooldown.as_u64() as f64
        - attacker.agility as f64 * tunables.agility_cooldown_factor;
    let floor = tunables.min_attack_cooldown.as_u64() as f64;
    Millis::new(reduced.max(floor) as u64)
}

/// Probability of dodging an incoming hit, in `[0, max_dodge_chance]`.
#[must_use]
pub fn dodge_chance(defender: &FighterStats, tunables: &CombatTunables) -> f64 {
    (defender.agility as f64 * tunables.dodge_multiplier / 100.0).min(tunables.max_dodge_chance)
}

/// Horizontal speed in px/s.
#[must_use]
pub fn move_speed(fighter: &FighterStats, tunables: &CombatTunables) -> f32 {
    (tunables.base_move_speed + fighter.agility as f64 * tunables.agility_speed_factor) as f32
}

/// Damage left after the defender's defense, never less than 1.
#[must_use]
pub fn mitigate(raw_damage: u64, defender: &FighterStats, tunables: &CombatTunables) -> u64 {
    let reduced = raw_damage as f64 - defender.defense as f64 * tunables.defense_multiplier;
    reduced.round().max(1.0) as u64
}

/// Offers a hit to a defender and applies it if it lands.
///
/// Dead or invulnerable defenders refuse the hit without consuming a draw.
/// Otherwise one draw decides the dodge. A landed hit lowers health (floored
/// at zero), clears `can_take_hit` and, at zero health, sets `is_dead`.
/// Re-arming `can_take_hit` is the caller's job once its window has passed.
pub fn resolve_hit(
    defender: &mut Vitals,
    raw_damage: u64,
    tunables: &CombatTunables,
    rng: &mut dyn RandomSource,
) -> HitOutcome {
    if defender.is_dead || !defender.can_take_hit {
        return HitOutcome::Refused;
    }

    if rng.chance(dodge_chance(&defender.stats, tunables)) {
        return HitOutcome::Dodged;
    }

    let damage = mitigate(raw_damage, &defender.stats, tunables);
    defender.stats.current_health = defender.stats.current_health.saturating_sub(damage);
    defender.can_take_hit = false;

    let died = defender.stats.is_depleted();
    if died {
        defender.is_dead = true;
    }

    HitOutcome::Landed { damage, died }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    fn tunables() -> CombatTunables {
        CombatTunables::default()
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn strength_twenty_non_critical() {
            let attacker = FighterStats::new(20, 0, 0, 100);
            let mut rng = ScriptedRandom::constant(0.0);
            let roll = compute_damage(&attacker, &tunables(), &mut rng);
            assert_eq!(roll, DamageRoll::plain(26));
        }

        #[test]
        fn critical_multiplies_then_rounds() {
            // crit chance = 100 * 0.3 / 100 = 0.3
            let attacker = FighterStats::new(20, 100, 0, 100);
            let mut rng = ScriptedRandom::constant(0.1);
            let roll = compute_damage(&attacker, &tunables(), &mut rng);
            assert!(roll.critical);
            assert_eq!(roll.amount, 39); // round(26 * 1.5)
        }

        #[test]
        fn crit_roll_fails_above_chance() {
            let attacker = FighterStats::new(20, 100, 0, 100);
            let mut rng = ScriptedRandom::constant(0.3);
            assert!(!compute_damage(&attacker, &tunables(), &mut rng).critical);
        }

        #[test]
        fn extreme_agility_is_a_guaranteed_critical() {
            let attacker = FighterStats::new(0, 1_000, 0, 100);
            assert!(crit_chance(&attacker, &tunables()) > 1.0);
            let mut rng = ScriptedRandom::constant(0.999_999);
            assert!(compute_damage(&attacker, &tunables(), &mut rng).critical);
        }

        #[test]
        fn boss_build_always_crits() {
            let boss = FighterStats::boss();
            let mut rng = ScriptedRandom::new([0.0, 0.5, 0.999]);
            for _ in 0..3 {
                let roll = compute_damage(&boss, &tunables(), &mut rng);
                assert!(roll.critical);
                assert_eq!(roll.amount, 615); // round((10 + 400) * 1.5)
            }
        }
    }

    mod cooldown_tests {
        use super::*;

        #[test]
        fn zero_agility_gets_base_cooldown() {
            let stats = FighterStats::new(0, 0, 0, 1);
            assert_eq!(attack_cooldown(&stats, &tunables()), Millis::new(1_000));
        }

        #[test]
        fn agility_reduces_cooldown() {
            let stats = FighterStats::new(0, 10, 0, 1);
            assert_eq!(attack_cooldown(&stats, &tunables()), Millis::new(800));
        }

        #[test]
        fn cooldown_floors_at_minimum() {
            let stats = FighterStats::new(0, 40, 0, 1);
            assert_eq!(attack_cooldown(&stats, &tunables()), Millis::new(200));
            assert_eq!(
                attack_cooldown(&FighterStats::boss(), &tunables()),
                Millis::new(200)
            );
        }
    }

    mod dodge_and_speed_tests {
        use super::*;

        #[test]
        fn dodge_chance_scales_then_caps() {
            let t = tunables();
            assert!(dodge_chance(&FighterStats::new(0, 0, 0, 1), &t).abs() < f64::EPSILON);
            assert!((dodge_chance(&FighterStats::new(0, 40, 0, 1), &t) - 0.2).abs() < 1e-12);
            assert!((dodge_chance(&FighterStats::new(0, 100, 0, 1), &t) - 0.5).abs() < 1e-12);
            assert!((dodge_chance(&FighterStats::boss(), &t) - 0.5).abs() < 1e-12);
        }

        #[test]
        fn move_speed_grows_with_agility() {
            let t = tunables();
            assert!((move_speed(&FighterStats::new(0, 0, 0, 1), &t) - 200.0).abs() < 1e-3);
            assert!((move_speed(&FighterStats::new(0, 100, 0, 1), &t) - 250.0).abs() < 1e-3);
        }
    }

    mod resolve_hit_tests {
        use super::*;

        #[test]
        fn defense_reduces_damage() {
            let mut defender = Vitals::new(FighterStats::new(0, 0, 10, 100));
            let mut rng = ScriptedRandom::constant(0.9);
            let outcome = resolve_hit(&mut defender, 26, &tunables(), &mut rng);
            assert_eq!(
                outcome,
                HitOutcome::Landed {
                    damage: 23,
                    died: false
                }
            );
            assert_eq!(defender.stats.current_health, 77);
            assert!(!defender.can_take_hit);
        }

        #[test]
        fn damage_never_below_one() {
            let boss = FighterStats::boss();
            assert_eq!(mitigate(26, &boss, &tunables()), 1);
            assert_eq!(mitigate(0, &FighterStats::new(0, 0, 0, 1), &tunables()), 1);
        }

        #[test]
        fn dodge_leaves_state_untouched() {
            let stats = FighterStats::new(0, 100, 0, 100);
            let mut defender = Vitals::new(stats);
            let mut rng = ScriptedRandom::constant(0.1);
            let outcome = resolve_hit(&mut defender, 50, &tunables(), &mut rng);
            assert_eq!(outcome, HitOutcome::Dodged);
            assert_eq!(defender, Vitals::new(stats));
        }

        #[test]
        fn invulnerable_refuses_without_drawing() {
            let mut defender = Vitals::new(FighterStats::new(0, 0, 0, 100));
            defender.can_take_hit = false;
            let mut rng = ScriptedRandom::constant(0.9);
            let outcome = resolve_hit(&mut defender, 50, &tunables(), &mut rng);
            assert_eq!(outcome, HitOutcome::Refused);
            assert_eq!(rng.consumed(), 0);
            assert_eq!(defender.stats.current_health, 100);
        }

        #[test]
        fn lethal_hit_floors_health_and_kills() {
            let mut defender = Vitals::new(FighterStats::new(0, 0, 0, 30));
            let mut rng = ScriptedRandom::constant(0.9);
            let outcome = resolve_hit(&mut defender, 500, &tunables(), &mut rng);
            assert_eq!(
                outcome,
                HitOutcome::Landed {
                    damage: 500,
                    died: true
                }
            );
            assert_eq!(defender.stats.current_health, 0);
            assert!(defender.is_dead);
        }

        #[test]
        fn dead_defender_refuses() {
            let mut defender = Vitals::new(FighterStats::new(0, 0, 0, 30));
            defender.is_dead = true;
            defender.stats.current_health = 0;
            let mut rng = ScriptedRandom::constant(0.9);
            assert_eq!(
                resolve_hit(&mut defender, 10, &tunables(), &mut rng),
                HitOutcome::Refused
            );
            assert!(!HitOutcome::Refused.landed());
        }
    }
}
