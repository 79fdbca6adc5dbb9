//! Property tests for the combat model and fighter state machine.

use proptest::prelude::*;

use crate::combat::{self, HitOutcome, Vitals};
use crate::config::CombatTunables;
use crate::fighter::FighterStats;
use crate::intent::AttackKind;
use crate::rng::ScriptedRandom;
use crate::time::Millis;

use super::helpers::{human, never_lucky};

fn stats_strategy() -> impl Strategy<Value = FighterStats> {
    (0u64..1_000, 0u64..100_000, 0u64..1_000, 1u64..1_000)
        .prop_map(|(strength, agility, defense, max_health)| {
            FighterStats::new(strength, agility, defense, max_health)
        })
}

proptest! {
    #[test]
    fn dodge_chance_is_bounded(agility in any::<u64>()) {
        let chance = combat::dodge_chance(&FighterStats::new(0, agility, 0, 1), &CombatTunables::default());
        prop_assert!((0.0..=0.5).contains(&chance));
    }

    #[test]
    fn attack_cooldown_never_below_floor(agility in any::<u64>()) {
        let cooldown = combat::attack_cooldown(&FighterStats::new(0, agility, 0, 1), &CombatTunables::default());
        prop_assert!(cooldown >= Millis::new(200));
        prop_assert!(cooldown <= Millis::new(1_000));
    }

    #[test]
    fn hits_never_overdraw_and_death_is_terminal(
        stats in stats_strategy(),
        hits in prop::collection::vec((1u64..500, 0.0f64..1.0), 1..40),
    ) {
        let tunables = CombatTunables::default();
        let mut vitals = Vitals::new(stats);

        for (raw, draw) in hits {
            let before = vitals.stats.current_health;
            let was_dead = vitals.is_dead;
            let outcome = combat::resolve_hit(&mut vitals, raw, &tunables, &mut ScriptedRandom::constant(draw));

            prop_assert!(vitals.stats.current_health <= before);
            prop_assert_eq!(vitals.is_dead, vitals.stats.current_health == 0);
            if was_dead {
                prop_assert_eq!(outcome, HitOutcome::Refused);
                prop_assert!(vitals.is_dead);
            }
            if let HitOutcome::Landed { damage, died } = outcome {
                prop_assert!(damage >= 1);
                prop_assert_eq!(vitals.stats.current_health, before.saturating_sub(damage));
                prop_assert_eq!(died, vitals.is_dead);
            }
            // reopen the window as the fighter's timer would
            vitals.can_take_hit = true;
        }
    }

    #[test]
    fn zero_defense_takes_rolled_damage(attacker in stats_strategy(), crit_draw in 0.0f64..1.0) {
        let tunables = CombatTunables::default();
        let roll = combat::compute_damage(&attacker, &tunables, &mut ScriptedRandom::constant(crit_draw));
        prop_assume!(roll.amount >= 1);

        let mut vitals = Vitals::new(FighterStats::new(0, 0, 0, 1_000_000));
        let outcome = combat::resolve_hit(&mut vitals, roll.amount, &tunables, &mut never_lucky());
        prop_assert_eq!(outcome, HitOutcome::Landed { damage: roll.amount, died: false });
        prop_assert_eq!(vitals.stats.current_health, 1_000_000 - roll.amount);
    }

    #[test]
    fn second_hit_inside_window_is_refused(offset in 0u64..500) {
        let mut fighter = human(FighterStats::new(0, 0, 0, 1_000));
        prop_assert!(fighter.take_hit(10, Millis::ZERO, &mut never_lucky()));
        prop_assert!(!fighter.take_hit(10, Millis::new(offset), &mut never_lucky()));
        prop_assert_eq!(fighter.current_health(), 990);
    }

    #[test]
    fn combo_stage_follows_gap(gap in 200u64..2_000) {
        // agility 40: 200 ms cooldown
        let mut fighter = human(FighterStats::new(0, 40, 0, 100));
        fighter.attack(AttackKind::Primary, Millis::ZERO);
        fighter.attack(AttackKind::Primary, Millis::new(gap));
        let expected = if gap < 500 { 2 } else { 1 };
        prop_assert_eq!(fighter.combo_stage(), expected);
    }

    #[test]
    fn reset_matches_fresh_fighter(
        stats in stats_strategy(),
        hits in prop::collection::vec(1u64..200, 0..10),
        attack_at in 0u64..5_000,
    ) {
        let fresh = human(stats);
        let mut fighter = human(stats);
        fighter.attack(AttackKind::Secondary, Millis::new(attack_at));
        for (i, raw) in hits.into_iter().enumerate() {
            fighter.take_hit(raw, Millis::new(attack_at + 600 * i as u64), &mut never_lucky());
        }

        fighter.reset(Millis::ZERO);

        prop_assert_eq!(fighter.stats(), fresh.stats());
        prop_assert_eq!(fighter.position(), fresh.position());
        prop_assert_eq!(fighter.velocity(), fresh.velocity());
        prop_assert_eq!(fighter.is_dead(), fresh.is_dead());
        prop_assert_eq!(fighter.is_attacking(), fresh.is_attacking());
        prop_assert_eq!(fighter.can_take_hit(), fresh.can_take_hit());
        prop_assert_eq!(fighter.combo_stage(), fresh.combo_stage());
        prop_assert_eq!(fighter.state(), fresh.state());
        prop_assert_eq!(fighter.last_attack_time(), fresh.last_attack_time());
    }
}
