//! Fixtures for duel and fighter tests.

use std::sync::Arc;

use glam::Vec2;

use crate::ai::OpponentView;
use crate::config::{DuelConfig, Rules, StageConfig};
use crate::duel::{Duel, FRAME};
use crate::event::{CombatEvent, Side};
use crate::fighter::{Fighter, FighterConfig, FighterStats};
use crate::intent::Intent;
use crate::rng::{RandomSource, ScriptedRandom};
use crate::time::Millis;

// =============================================================================
// Random Sources
// =============================================================================

/// A source whose draws never pass a dodge, crit or AI gate below 0.99.
pub fn never_lucky() -> ScriptedRandom {
    ScriptedRandom::constant(0.99)
}

// =============================================================================
// Duels
// =============================================================================

/// A config where both bodies overlap at spawn (x = 620 and x = 660).
pub fn face_to_face(player: FighterStats, opponent: FighterStats) -> DuelConfig {
    DuelConfig {
        stage: StageConfig {
            spawn_inset: 620.0,
            ..StageConfig::default()
        },
        player_stats: player,
        opponent_stats: opponent,
        ..DuelConfig::default()
    }
}

/// Builds a duel over a scripted source that never rolls lucky.
pub fn scripted_duel(config: DuelConfig) -> Duel<ScriptedRandom> {
    Duel::with_random(config, never_lucky()).unwrap()
}

/// Builds an AI-vs-AI duel with stock stats.
pub fn autoplay_duel(seed: u64) -> Duel {
    let config = DuelConfig {
        autoplay: true,
        ..DuelConfig::default()
    };
    Duel::new(config, seed).unwrap()
}

/// Steps with the same inputs `frames` times, stopping early if the round ends.
///
/// Returns the number of frames actually stepped.
pub fn step_frames<R: RandomSource>(
    duel: &mut Duel<R>,
    frames: usize,
    inputs: [Option<Intent>; 2],
) -> usize {
    for stepped in 0..frames {
        if duel.is_over() {
            return stepped;
        }
        duel.step(FRAME, inputs);
    }
    frames
}

/// Counts events of one fighter matching `predicate`.
pub fn count_events(
    events: &[CombatEvent],
    side: Side,
    predicate: impl Fn(&CombatEvent) -> bool,
) -> usize {
    events
        .iter()
        .filter(|e| e.fighter() == Some(side) && predicate(e))
        .count()
}

// =============================================================================
// Fighters
// =============================================================================

/// A human fighter on the left with the given stats.
pub fn human(stats: FighterStats) -> Fighter {
    let config = FighterConfig::human(Side::Left, StageConfig::default()).with_stats(stats);
    Fighter::new(config, Arc::new(Rules::default())).unwrap()
}

/// An opponent snapshot standing at `x` on the spawn line.
pub fn opponent_at(x: f32, last_activity: Millis) -> OpponentView {
    OpponentView {
        side: Side::Left,
        position: Vec2::new(x, 800.0),
        is_attacking: false,
        is_dead: false,
        last_activity,
    }
}
