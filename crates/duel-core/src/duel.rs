//! The duel: two fighters, a countdown and the win condition.
//!
//! A [`Duel`] owns both fighters and advances them in a fixed order each
//! [`Duel::step`]:
//!
//! 1. **Snapshot** - both fighters publish an [`OpponentView`]
//! 2. **Update** - left then right: timers, controller, motion
//! 3. **Stacking** - fighters pass through each other sideways, but one that
//!    comes down on the other's head rests there
//! 4. **Overlap** - each fighter that was attacking and whose body overlaps
//!    the other's offers a hit (left first)
//! 5. **Countdown** - one event per elapsed second
//! 6. **Outcome** - a death ends the round by knockout, an empty clock by
//!    time-up; health decides the winner and equal health is a tie
//!
//! Randomness comes from the duel's own generator, so two duels built from the
//! same config and seed and fed the same inputs produce the same events.
//!
//! # Example
//!
//! ```
//! use duel_core::config::DuelConfig;
//! use duel_core::duel::{Duel, FRAME};
//!
//! let mut duel = Duel::new(DuelConfig::default(), 7).unwrap();
//! duel.step(FRAME, [None, None]);
//!
//! assert!(!duel.is_over());
//! assert_eq!(duel.remaining_secs(), 60);
//! ```

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::OpponentView;
use crate::config::{DuelConfig, Rules};
use crate::error::DuelResult;
use crate::event::{CombatEvent, DuelOutcome, EndReason, EventLog, Side};
use crate::fighter::{Fighter, FighterConfig};
use crate::intent::Intent;
use crate::rng::{self, RandomSource};
use crate::schedule::Scheduler;
use crate::time::Millis;

/// One display frame at roughly 60 Hz.
pub const FRAME: Millis = Millis::new(16);

const SECOND: Millis = Millis::from_secs(1);

/// Whether the round is still being played.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelPhase {
    /// Fighters are being updated
    Running,
    /// The round is decided; [`Duel::step`] is a no-op until [`Duel::retry`]
    Over {
        /// Result
        outcome: DuelOutcome,
        /// Cause
        reason: EndReason,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct CountdownTick {
    due: Millis,
}

/// A single round between two fighters.
#[derive(Debug)]
pub struct Duel<R = ChaCha8Rng> {
    fighters: [Fighter; 2],
    rules: Arc<Rules>,
    round_secs: u32,
    remaining_secs: u32,
    clock: Millis,
    countdown: Scheduler<CountdownTick>,
    phase: DuelPhase,
    rng: R,
    events: EventLog,
}

impl Duel<ChaCha8Rng> {
    /// Creates a duel whose rolls come from a ChaCha8 generator seeded with
    /// `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DuelError`] if the config fails validation.
    pub fn new(config: DuelConfig, seed: u64) -> DuelResult<Self> {
        Self::with_random(config, rng::seeded(seed))
    }
}

impl<R: RandomSource> Duel<R> {
    /// Creates a duel that draws from `rng`.
    ///
    /// The left fighter is human-controlled unless `config.autoplay` is set;
    /// the right fighter is always the AI.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DuelError`] if the config fails validation.
    pub fn with_random(config: DuelConfig, rng: R) -> DuelResult<Self> {
        config.validate()?;
        let rules = Arc::new(config.rules);

        let left = if config.autoplay {
            FighterConfig::ai(Side::Left, config.stage.clone())
        } else {
            FighterConfig::human(Side::Left, config.stage.clone())
        }
        .with_stats(config.player_stats);
        let right = FighterConfig::ai(Side::Right, config.stage).with_stats(config.opponent_stats);

        let fighters = [
            Fighter::new(left, Arc::clone(&rules))?,
            Fighter::new(right, Arc::clone(&rules))?,
        ];

        let mut countdown = Scheduler::new();
        countdown.schedule(SECOND, CountdownTick { due: SECOND });

        info!(round_secs = config.round_secs, "duel started");

        Ok(Self {
            fighters,
            rules,
            round_secs: config.round_secs,
            remaining_secs: config.round_secs,
            clock: Millis::ZERO,
            countdown,
            phase: DuelPhase::Running,
            rng,
            events: EventLog::new(),
        })
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advances the duel by one tick.
    ///
    /// Does nothing once the round is over. Events recorded during the tick
    /// are available from [`Duel::take_events`]; when the round ends,
    /// [`CombatEvent::DuelEnded`] is the last of them.
    ///
    /// # Arguments
    ///
    /// * `dt` - Host time elapsed since the previous step
    /// * `inputs` - Intents indexed by [`Side::index`]; AI fighters ignore
    ///   their entry
    pub fn step(&mut self, dt: Millis, inputs: [Option<Intent>; 2]) {
        if self.is_over() {
            return;
        }

        self.clock += dt;
        let now = self.clock;
        let dt_secs = dt.as_secs_f32();

        // Phase 1: snapshot
        let views: [OpponentView; 2] = [self.fighters[0].view(), self.fighters[1].view()];

        // Phase 2: update
        for side in [Side::Left, Side::Right] {
            let opponent = views[side.opposite().index()];
            self.fighters[side.index()].update(
                now,
                dt_secs,
                inputs[side.index()],
                Some(&opponent),
                &mut self.rng,
            );
        }

        // Phase 3: stacking
        self.separate_stacked();

        // Phase 4: overlap
        if self.fighters[0].hitbox().overlaps(&self.fighters[1].hitbox()) {
            let swinging = [self.fighters[0].is_attacking(), self.fighters[1].is_attacking()];
            for side in [Side::Left, Side::Right] {
                if swinging[side.index()] {
                    self.strike(side);
                }
            }
        }
        self.collect_fighter_events();

        // Phase 5: countdown
        self.run_countdown(now);

        // Phase 6: outcome
        let knocked_out = self.fighters.iter().any(Fighter::is_dead);
        if knocked_out {
            self.end(EndReason::Knockout);
        } else if self.remaining_secs == 0 {
            self.end(EndReason::TimeUp);
        }
    }

    /// Handles an overlap reported by the host: if `attacker` is mid-attack,
    /// its opponent is offered a freshly rolled hit.
    ///
    /// Returns `true` if the hit landed.
    pub fn on_overlap(&mut self, attacker: Side) -> bool {
        if self.is_over() || !self.fighters[attacker.index()].is_attacking() {
            return false;
        }
        self.strike(attacker)
    }

    fn separate_stacked(&mut self) {
        let [left, right] = &mut self.fighters;
        let (upper, lower) = if left.position().y < right.position().y {
            (left, right)
        } else {
            (right, left)
        };

        let support = lower.hitbox();
        let offset = support.center.y - upper.position().y;
        if offset > self.rules.motion.stack_threshold && upper.hitbox().overlaps(&support) {
            upper.rest_on(&support);
        }
    }

    fn strike(&mut self, attacker: Side) -> bool {
        let now = self.clock;
        let [left, right] = &mut self.fighters;
        let (striker, defender) = match attacker {
            Side::Left => (left, right),
            Side::Right => (right, left),
        };

        let roll = striker.roll_damage(&mut self.rng);
        defender.receive(roll, now, &mut self.rng).landed()
    }

    fn run_countdown(&mut self, now: Millis) {
        loop {
            let due = self.countdown.drain_due(now);
            if due.is_empty() {
                break;
            }
            for tick in due {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                self.events.record(CombatEvent::Countdown {
                    remaining_secs: self.remaining_secs,
                });
                if self.remaining_secs > 0 {
                    let next = tick.due + SECOND;
                    self.countdown.schedule(next, CountdownTick { due: next });
                }
            }
        }
    }

    fn collect_fighter_events(&mut self) {
        for fighter in &mut self.fighters {
            self.events.absorb(fighter.events_mut());
        }
    }

    fn end(&mut self, reason: EndReason) {
        let outcome = self.standing();
        self.countdown.cancel_all();
        for fighter in &mut self.fighters {
            fighter.halt(self.clock);
        }
        self.collect_fighter_events();
        if reason == EndReason::Knockout {
            self.remaining_secs = 0;
        }

        self.phase = DuelPhase::Over { outcome, reason };
        info!(?outcome, ?reason, at = %self.clock, "duel ended");
        self.events.record(CombatEvent::DuelEnded { outcome, reason });
    }

    fn standing(&self) -> DuelOutcome {
        let left = self.fighters[0].current_health();
        let right = self.fighters[1].current_health();
        match left.cmp(&right) {
            std::cmp::Ordering::Greater => DuelOutcome::Winner(Side::Left),
            std::cmp::Ordering::Less => DuelOutcome::Winner(Side::Right),
            std::cmp::Ordering::Equal => DuelOutcome::Tie,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts a fresh round: both fighters reset, the clock refilled.
    pub fn retry(&mut self) {
        let now = self.clock;
        for fighter in &mut self.fighters {
            fighter.reset(now);
        }
        self.countdown.cancel_all();
        let first = now + SECOND;
        self.countdown.schedule(first, CountdownTick { due: first });
        self.remaining_secs = self.round_secs;
        self.phase = DuelPhase::Running;
        self.collect_fighter_events();
        debug!(at = %now, "duel restarted");
    }

    /// Drains every event recorded since the last call, in order.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        self.collect_fighter_events();
        self.events.take_events()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The fighter on `side`.
    #[must_use]
    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    /// Mutable access to the fighter on `side`.
    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        &mut self.fighters[side.index()]
    }

    /// Both fighters, left first.
    #[must_use]
    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    /// Shared tunables.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Running or over.
    #[must_use]
    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    /// The result, once decided.
    #[must_use]
    pub fn outcome(&self) -> Option<DuelOutcome> {
        match self.phase {
            DuelPhase::Running => None,
            DuelPhase::Over { outcome, .. } => Some(outcome),
        }
    }

    /// Returns `true` once the round is decided.
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, DuelPhase::Over { .. })
    }

    /// Seconds left on the round clock.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Round length in seconds.
    #[must_use]
    pub fn round_secs(&self) -> u32 {
        self.round_secs
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.clock
    }
}
