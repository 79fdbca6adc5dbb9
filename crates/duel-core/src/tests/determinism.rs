//! Determinism verification tests.
//!
//! A duel is fully determined by its config, its seed and the host inputs.
//! Replays and bug reports depend on this.

use crate::duel::{Duel, FRAME};
use crate::event::{CombatEvent, Side};
use crate::intent::Intent;

use super::helpers::autoplay_duel;

/// Runs an AI-vs-AI round and records every event plus each frame's positions.
fn record(seed: u64, frames: usize) -> (Vec<CombatEvent>, Vec<[glam::Vec2; 2]>) {
    let mut duel = autoplay_duel(seed);
    let mut events = Vec::new();
    let mut positions = Vec::with_capacity(frames);

    for _ in 0..frames {
        duel.step(FRAME, [None, None]);
        events.extend(duel.take_events());
        positions.push([
            duel.fighter(Side::Left).position(),
            duel.fighter(Side::Right).position(),
        ]);
    }

    (events, positions)
}

#[test]
fn same_seed_same_round() {
    let (events1, positions1) = record(42, 1_500);
    let (events2, positions2) = record(42, 1_500);

    assert_eq!(events1, events2, "event streams diverged");
    assert_eq!(positions1, positions2, "positions diverged");
}

#[test]
fn same_seed_same_round_with_human_inputs() {
    let script = |frame: usize| -> Option<Intent> {
        match frame % 40 {
            0..=9 => Some(Intent::RIGHT),
            10 => Some(Intent::JUMP | Intent::RIGHT),
            11..=19 => Some(Intent::RIGHT),
            20 => Some(Intent::JUMP_RELEASED | Intent::ATTACK_PRIMARY),
            25 => Some(Intent::ATTACK_SECONDARY),
            _ => None,
        }
    };

    let run = || {
        let mut duel = Duel::new(crate::config::DuelConfig::default(), 9).unwrap();
        let mut events = Vec::new();
        for frame in 0..2_000 {
            duel.step(FRAME, [script(frame), None]);
            events.extend(duel.take_events());
        }
        (events, duel.outcome(), duel.now())
    };

    assert_eq!(run(), run());
}

#[test]
fn event_order_is_stable_within_a_frame() {
    let (events, _) = record(7, 1_000);
    let ended = events
        .iter()
        .position(|e| matches!(e, CombatEvent::DuelEnded { .. }));
    if let Some(index) = ended {
        assert_eq!(index, events.len() - 1, "nothing may follow the end of the round");
    }
}
