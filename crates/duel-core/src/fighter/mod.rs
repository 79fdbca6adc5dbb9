//! The fighter: one combatant's state machine.
//!
//! A [`Fighter`] is composed of a kinematic [`Body`], combat [`Vitals`] and a
//! [`Controller`] (human intents or an [`AiBrain`]). Every tick the duel
//! calls [`Fighter::update`], which:
//!
//! 1. fires due timers (attack end, end of the invulnerability window),
//! 2. obtains this tick's [`Steering`] from the controller,
//! 3. applies movement, jump and attack,
//! 4. integrates the body and re-derives the display [`FighterState`].
//!
//! Invalid actions (attacking on cooldown, hitting an invulnerable or dead
//! fighter) are silent no-ops; only [`Fighter::take_hit`] reports whether the
//! hit landed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use duel_core::config::{Rules, StageConfig};
//! use duel_core::event::Side;
//! use duel_core::fighter::{Fighter, FighterConfig, FighterStats};
//! use duel_core::rng::ScriptedRandom;
//! use duel_core::time::Millis;
//!
//! let config = FighterConfig::human(Side::Left, StageConfig::default())
//!     .with_stats(FighterStats::new(20, 0, 0, 100));
//! let mut fighter = Fighter::new(config, Arc::new(Rules::default())).unwrap();
//!
//! let mut rng = ScriptedRandom::constant(0.99);
//! assert!(fighter.take_hit(26, Millis::ZERO, &mut rng));
//! assert_eq!(fighter.current_health(), 74);
//! ```

pub mod body;
pub mod stats;

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use body::{Body, Rect};
pub use stats::FighterStats;

use crate::ai::{AiBrain, OpponentView, SelfView};
use crate::combat::{self, DamageRoll, HitOutcome, Vitals};
use crate::config::{Rules, StageConfig};
use crate::error::DuelResult;
use crate::event::{CombatEvent, EventLog, Side};
use crate::intent::{AttackKind, Intent, Movement, Steering};
use crate::rng::RandomSource;
use crate::schedule::{Scheduler, TaskHandle};
use crate::time::Millis;

// =============================================================================
// State
// =============================================================================

/// Display state of a fighter.
///
/// `Dead` is absorbing until [`Fighter::reset`]. `Attacking` is held for the
/// attack duration, even through a hit; `TakingHit` until the next update.
/// Otherwise the state follows the velocity.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterState {
    /// Standing still
    #[default]
    Idle,
    /// Moving horizontally on the floor
    Moving,
    /// Rising
    Jumping,
    /// Falling
    Falling,
    /// Attack window open
    Attacking,
    /// Just took a hit
    TakingHit,
    /// Health reached zero
    Dead,
}

impl FighterState {
    fn from_velocity(velocity: Vec2) -> Self {
        if velocity.y < 0.0 {
            Self::Jumping
        } else if velocity.y > 0.0 {
            Self::Falling
        } else if velocity.x != 0.0 {
            Self::Moving
        } else {
            Self::Idle
        }
    }
}

/// Who drives a fighter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    /// Intents supplied by the host each tick
    Human,
    /// The rule-based policy
    Ai(AiBrain),
}

impl Controller {
    /// A fresh AI controller.
    #[must_use]
    pub fn ai() -> Self {
        Self::Ai(AiBrain::new())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FighterTask {
    EndAttack,
    RestoreHitWindow,
}

// =============================================================================
// Configuration
// =============================================================================

/// How to build a fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterConfig {
    /// Human or AI
    pub controller: Controller,
    /// Starting side, also the fighter's identity
    pub side: Side,
    /// Spawn point, restored by [`Fighter::reset`]
    pub initial_position: Vec2,
    /// Stats; `None` means [`FighterStats::default`]
    pub stats: Option<FighterStats>,
    /// Stage the body is confined to
    pub stage: StageConfig,
}

impl FighterConfig {
    /// A human fighter at the stage's spawn point for `side`.
    #[must_use]
    pub fn human(side: Side, stage: StageConfig) -> Self {
        Self {
            controller: Controller::Human,
            side,
            initial_position: stage.spawn(side),
            stats: None,
            stage,
        }
    }

    /// An AI fighter at the stage's spawn point for `side`.
    #[must_use]
    pub fn ai(side: Side, stage: StageConfig) -> Self {
        Self {
            controller: Controller::ai(),
            ..Self::human(side, stage)
        }
    }

    /// Overrides the stats.
    #[must_use]
    pub fn with_stats(mut self, stats: FighterStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Overrides the spawn point.
    #[must_use]
    pub fn at(mut self, position: Vec2) -> Self {
        self.initial_position = position;
        self
    }
}

// =============================================================================
// Fighter
// =============================================================================

/// One combatant.
#[derive(Debug, Clone)]
pub struct Fighter {
    side: Side,
    controller: Controller,
    rules: Arc<Rules>,
    initial_position: Vec2,
    initial_stats: FighterStats,
    vitals: Vitals,
    body: Body,
    state: FighterState,
    is_attacking: bool,
    last_attack_time: Option<Millis>,
    combo_stage: u8,
    last_activity: Millis,
    facing: f32,
    timers: Scheduler<FighterTask>,
    attack_timer: Option<TaskHandle>,
    events: EventLog,
}

impl Fighter {
    /// Creates a fighter at full health.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DuelError`] when the stats, rules or stage are invalid.
    pub fn new(config: FighterConfig, rules: Arc<Rules>) -> DuelResult<Self> {
        rules.validate()?;
        config.stage.validate()?;
        let mut stats = config.stats.unwrap_or_default();
        stats.validate()?;
        stats.restore();

        let body = Body::new(config.initial_position, rules.motion.body_size, &config.stage);

        Ok(Self {
            side: config.side,
            controller: config.controller,
            rules,
            initial_position: config.initial_position,
            initial_stats: stats,
            vitals: Vitals::new(stats),
            body,
            state: FighterState::Idle,
            is_attacking: false,
            last_attack_time: None,
            combo_stage: 1,
            last_activity: Millis::ZERO,
            facing: default_facing(config.side),
            timers: Scheduler::new(),
            attack_timer: None,
            events: EventLog::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Starts an attack unless attacking, dead or on cooldown.
    ///
    /// A primary attack started within the combo window of the previous one
    /// is a stage-2 combo; a secondary attack is always stage 2.
    pub fn attack(&mut self, kind: AttackKind, now: Millis) {
        self.fire_due(now);
        if self.is_attacking || self.vitals.is_dead {
            return;
        }

        let cooldown = combat::attack_cooldown(&self.vitals.stats, &self.rules.combat);
        let since_last = self.last_attack_time.map(|t| now.since(t));
        if since_last.is_some_and(|since| since < cooldown) {
            return;
        }

        self.combo_stage = match kind {
            AttackKind::Secondary => 2,
            AttackKind::Primary => {
                if since_last.is_some_and(|since| since < self.rules.timing.combo_window) {
                    2
                } else {
                    1
                }
            }
        };

        self.last_attack_time = Some(now);
        self.last_activity = now;
        self.is_attacking = true;
        self.state = FighterState::Attacking;
        self.attack_timer = Some(
            self.timers
                .schedule(now + self.rules.timing.attack_duration, FighterTask::EndAttack),
        );

        debug!(fighter = %self.side, ?kind, stage = self.combo_stage, %now, "attack started");
        self.events.record(CombatEvent::AttackStarted {
            fighter: self.side,
            kind,
            stage: self.combo_stage,
            at: now,
        });
    }

    /// Rolls this fighter's damage for one attack.
    pub fn roll_damage(&self, rng: &mut dyn RandomSource) -> DamageRoll {
        combat::compute_damage(&self.vitals.stats, &self.rules.combat, rng)
    }

    /// Offers `raw_damage` to this fighter. Returns `true` if it landed.
    pub fn take_hit(&mut self, raw_damage: u64, now: Millis, rng: &mut dyn RandomSource) -> bool {
        self.receive(DamageRoll::plain(raw_damage), now, rng).landed()
    }

    /// Offers a rolled hit to this fighter and reports what happened.
    pub fn receive(
        &mut self,
        roll: DamageRoll,
        now: Millis,
        rng: &mut dyn RandomSource,
    ) -> HitOutcome {
        self.fire_due(now);
        let outcome = combat::resolve_hit(&mut self.vitals, roll.amount, &self.rules.combat, rng);

        match outcome {
            HitOutcome::Refused => {}
            HitOutcome::Dodged => {
                debug!(fighter = %self.side, "hit dodged");
                self.events
                    .record(CombatEvent::HitDodged { defender: self.side });
            }
            HitOutcome::Landed { damage, died } => {
                let remaining = self.vitals.stats.current_health;
                debug!(
                    fighter = %self.side,
                    damage,
                    critical = roll.critical,
                    remaining,
                    "hit landed"
                );
                self.events.record(CombatEvent::HitLanded {
                    defender: self.side,
                    damage,
                    critical: roll.critical,
                    remaining,
                });

                if died {
                    self.die();
                } else {
                    if !self.is_attacking {
                        self.state = FighterState::TakingHit;
                    }
                    self.timers.schedule(
                        now + self.rules.timing.invulnerability,
                        FighterTask::RestoreHitWindow,
                    );
                }
            }
        }

        outcome
    }

    fn die(&mut self) {
        if let Some(handle) = self.attack_timer.take() {
            self.timers.cancel(handle);
        }
        self.body.freeze();
        self.is_attacking = false;
        self.state = FighterState::Dead;
        info!(fighter = %self.side, x = self.body.position.x, y = self.body.position.y, "fighter died");
        self.events.record(CombatEvent::Died {
            fighter: self.side,
            position: self.body.position,
        });
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances this fighter by one tick.
    ///
    /// Fires due timers, asks the controller for steering, applies it and
    /// integrates the body. A dead fighter only fires timers and holds still.
    ///
    /// # Arguments
    ///
    /// * `now` - Host time at the end of the tick
    /// * `dt` - Tick length in seconds
    /// * `input` - Host intents; ignored for AI fighters, `None` stops a human
    /// * `opponent` - Start-of-tick snapshot the AI decides on and the fighter
    ///   faces
    /// * `rng` - Source for the AI's random gates
    pub fn update(
        &mut self,
        now: Millis,
        dt: f32,
        input: Option<Intent>,
        opponent: Option<&OpponentView>,
        rng: &mut dyn RandomSource,
    ) {
        self.fire_due(now);
        if self.vitals.is_dead {
            self.body.velocity = Vec2::ZERO;
            return;
        }

        if let Some(opponent) = opponent {
            let dx = opponent.position.x - self.body.position.x;
            if dx != 0.0 {
                self.facing = dx.signum();
            }
        }

        let steering = self.steer(now, input, opponent, rng);
        self.apply(steering, now);
        self.body.integrate(dt, &self.rules.motion);

        if !self.is_attacking {
            self.state = FighterState::from_velocity(self.body.velocity);
        }
    }

    fn steer(
        &mut self,
        now: Millis,
        input: Option<Intent>,
        opponent: Option<&OpponentView>,
        rng: &mut dyn RandomSource,
    ) -> Steering {
        let me = self.self_view();
        match &mut self.controller {
            Controller::Human => {
                let mut steering = Steering::from_intent(input.unwrap_or_default());
                if self.is_attacking {
                    steering.movement = Movement::Stop;
                    steering.jump = false;
                }
                steering
            }
            Controller::Ai(brain) => match opponent {
                Some(opponent) if !opponent.is_dead => {
                    brain.decide(&me, opponent, now, &self.rules.ai, rng).steering
                }
                _ => Steering::IDLE,
            },
        }
    }

    fn apply(&mut self, steering: Steering, now: Millis) {
        match steering.movement {
            Movement::Hold => {}
            Movement::Stop => self.body.velocity.x = 0.0,
            Movement::Toward { direction, factor } => {
                self.body.velocity.x = direction * factor * self.move_speed();
            }
        }

        if steering.jump {
            self.body.velocity.y = self.rules.motion.jump_velocity;
            self.events.record(CombatEvent::Jumped { fighter: self.side });
        }
        if steering.jump_released && self.body.velocity.y < 0.0 {
            self.body.velocity.y *= self.rules.motion.jump_release_damping;
        }

        if let Some(kind) = steering.attack {
            self.attack(kind, now);
        }
    }

    fn fire_due(&mut self, now: Millis) {
        for task in self.timers.drain_due(now) {
            match task {
                FighterTask::EndAttack => {
                    self.attack_timer = None;
                    self.close_attack(now);
                }
                FighterTask::RestoreHitWindow => {
                    self.vitals.can_take_hit = true;
                    self.events
                        .record(CombatEvent::Vulnerable { fighter: self.side });
                }
            }
        }
    }

    fn close_attack(&mut self, now: Millis) {
        if !self.is_attacking {
            return;
        }
        self.is_attacking = false;
        if !self.vitals.is_dead {
            self.state = FighterState::from_velocity(self.body.velocity);
        }
        self.events.record(CombatEvent::AttackEnded {
            fighter: self.side,
            at: now,
        });
    }

    /// Rests this fighter on top of `support`, cancelling its fall.
    pub(crate) fn rest_on(&mut self, support: &Rect) {
        if self.vitals.is_dead {
            return;
        }
        self.body.rest_on(support);
        if !self.is_attacking {
            self.state = FighterState::from_velocity(self.body.velocity);
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Restores the post-construction state: full health, spawn point, no
    /// pending timers, all flags cleared. `now` becomes the last activity.
    pub fn reset(&mut self, now: Millis) {
        self.timers.cancel_all();
        self.attack_timer = None;
        self.vitals = Vitals::new(self.initial_stats);
        self.body.reset(self.initial_position);
        self.state = FighterState::Idle;
        self.is_attacking = false;
        self.last_attack_time = None;
        self.combo_stage = 1;
        self.last_activity = now;
        self.facing = default_facing(self.side);
        if let Controller::Ai(brain) = &mut self.controller {
            brain.reset();
        }
        debug!(fighter = %self.side, %now, "fighter reset");
        self.events.record(CombatEvent::Reset { fighter: self.side });
    }

    /// Closes an open attack at `now` and drops every pending timer.
    pub(crate) fn halt(&mut self, now: Millis) {
        self.close_attack(now);
        self.timers.cancel_all();
        self.attack_timer = None;
    }

    /// Drains this fighter's events.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        self.events.take_events()
    }

    pub(crate) fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// What the opponent may observe about this fighter.
    #[must_use]
    pub fn view(&self) -> OpponentView {
        OpponentView {
            side: self.side,
            position: self.body.position,
            is_attacking: self.is_attacking,
            is_dead: self.vitals.is_dead,
            last_activity: self.last_activity,
        }
    }

    fn self_view(&self) -> SelfView {
        SelfView {
            position: self.body.position,
            is_attacking: self.is_attacking,
        }
    }

    /// Collision box.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        self.body.hitbox()
    }

    /// The area in front of the fighter its attacks reach.
    #[must_use]
    pub fn attack_box(&self) -> Rect {
        let motion = &self.rules.motion;
        let offset = Vec2::new(self.facing * motion.attack_box_offset, 0.0);
        Rect::new(self.body.position + offset, motion.attack_box_size)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Starting side.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Whether the host drives this fighter.
    #[must_use]
    pub fn is_player_controlled(&self) -> bool {
        matches!(self.controller, Controller::Human)
    }

    /// The controller.
    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Current stats.
    #[must_use]
    pub fn stats(&self) -> &FighterStats {
        &self.vitals.stats
    }

    /// Shared tunables.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Health right now.
    #[must_use]
    pub fn current_health(&self) -> u64 {
        self.vitals.stats.current_health
    }

    /// Health at the start of a round.
    #[must_use]
    pub fn max_health(&self) -> u64 {
        self.vitals.stats.max_health
    }

    /// Strength stat.
    #[must_use]
    pub fn strength(&self) -> u64 {
        self.vitals.stats.strength
    }

    /// Agility stat.
    #[must_use]
    pub fn agility(&self) -> u64 {
        self.vitals.stats.agility
    }

    /// Defense stat.
    #[must_use]
    pub fn defense(&self) -> u64 {
        self.vitals.stats.defense
    }

    /// Horizontal speed in px/s, before the body's speed ceiling.
    #[must_use]
    pub fn move_speed(&self) -> f32 {
        combat::move_speed(&self.vitals.stats, &self.rules.combat)
    }

    /// Minimum time between this fighter's attacks.
    #[must_use]
    pub fn attack_cooldown(&self) -> Millis {
        combat::attack_cooldown(&self.vitals.stats, &self.rules.combat)
    }

    /// Whether the attack window is open.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Whether health has reached zero this round.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.vitals.is_dead
    }

    /// `false` during the invulnerability window and after death.
    #[must_use]
    pub fn can_take_hit(&self) -> bool {
        self.vitals.can_take_hit && !self.vitals.is_dead
    }

    /// Display state.
    #[must_use]
    pub fn state(&self) -> FighterState {
        self.state
    }

    /// Centre of the body.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Velocity in px/s.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// Mutable body, for hosts that run their own physics.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// 1 for a plain attack, 2 for a combo.
    #[must_use]
    pub fn combo_stage(&self) -> u8 {
        self.combo_stage
    }

    /// When the last successful attack started.
    #[must_use]
    pub fn last_attack_time(&self) -> Option<Millis> {
        self.last_attack_time
    }

    /// Last successful attack, or the last reset.
    #[must_use]
    pub fn last_activity(&self) -> Millis {
        self.last_activity
    }
}

fn default_facing(side: Side) -> f32 {
    match side {
        Side::Left => 1.0,
        Side::Right => -1.0,
    }
}
