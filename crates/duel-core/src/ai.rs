//! Rule-based AI policy.
//!
//! Each tick an AI-controlled fighter hands its [`AiBrain`] a view of itself
//! and an [`OpponentView`] snapshot. The brain walks a fixed rule list and the
//! first rule that matches produces the [`Steering`] for the tick:
//!
//! 1. **Forced pursuit**: the opponent has not attacked for longer than
//!    `forced_pursuit_after`: charge at pursuit speed, attack as soon as in
//!    range, jump in when far away.
//! 2. **Reactive dodge**: the opponent is swinging at close range: jump and
//!    retreat.
//! 3. **Opportunistic attack**: in range, off cooldown and the attack roll
//!    passes.
//! 4. **Approach**: within follow range: close in, slower when already near,
//!    with an occasional hop.
//! 5. **Idle**: stop.
//!
//! Draws are only taken when a rule reaches its random gate, so a
//! [`ScriptedRandom`](crate::rng::ScriptedRandom) can pin every branch.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::AiTunables;
use crate::event::Side;
use crate::intent::{AttackKind, Movement, Steering};
use crate::rng::RandomSource;
use crate::time::Millis;

/// What a fighter may observe about its opponent.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentView {
    /// Opponent's side
    pub side: Side,
    /// Centre of the opponent's body
    pub position: Vec2,
    /// Whether the opponent's attack window is open
    pub is_attacking: bool,
    /// Whether the opponent is dead
    pub is_dead: bool,
    /// When the opponent last started an attack (or when the round began)
    pub last_activity: Millis,
}

/// What the AI knows about its own fighter.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfView {
    /// Centre of the fighter's body
    pub position: Vec2,
    /// Whether the fighter's attack window is open
    pub is_attacking: bool,
}

/// The rule that produced a decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiRule {
    /// Opponent has been passive too long
    ForcedPursuit,
    /// Jumping away from an incoming attack
    ReactiveDodge,
    /// Attacking from range
    OpportunisticAttack,
    /// Closing the distance
    Approach,
    /// Nothing to do
    Idle,
}

/// A decision for one tick.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    /// Rule that fired
    pub rule: AiRule,
    /// Control to apply
    pub steering: Steering,
}

/// Timers the policy keeps between ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiBrain {
    last_jump: Option<Millis>,
    last_attack: Option<Millis>,
}

impl AiBrain {
    /// A brain that has never jumped or attacked.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When the AI last decided to jump.
    #[must_use]
    pub fn last_jump(&self) -> Option<Millis> {
        self.last_jump
    }

    /// When the AI last took an opportunistic attack.
    #[must_use]
    pub fn last_attack(&self) -> Option<Millis> {
        self.last_attack
    }

    /// Forgets all timers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` when the opponent has been passive for longer than the
    /// pursuit threshold.
    #[must_use]
    pub fn opponent_stalling(opponent: &OpponentView, now: Millis, tunables: &AiTunables) -> bool {
        now.since(opponent.last_activity) > tunables.forced_pursuit_after
    }

    /// Picks this tick's steering.
    ///
    /// Walks the rules in priority order and returns the first that matches.
    /// Random draws are taken only when a rule reaches its gate.
    ///
    /// # Arguments
    ///
    /// * `me` - The deciding fighter's own position and attack flag
    /// * `opponent` - Start-of-tick snapshot of the other fighter
    /// * `now` - Current host time
    /// * `tunables` - Ranges, cooldowns and probabilities
    /// * `rng` - Source for the attack, hop and pursuit-jump gates
    ///
    /// # Returns
    ///
    /// The rule that fired and the steering to apply. Movement factors are
    /// relative to the fighter's move speed.
    pub fn decide(
        &mut self,
        me: &SelfView,
        opponent: &OpponentView,
        now: Millis,
        tunables: &AiTunables,
        rng: &mut dyn RandomSource,
    ) -> AiDecision {
        let distance = me.position.distance(opponent.position);
        let toward = if me.position.x < opponent.position.x {
            1.0
        } else {
            -1.0
        };
        let jump_ready = now.elapsed_beyond(self.last_jump, tunables.jump_cooldown);

        let decision = if Self::opponent_stalling(opponent, now, tunables) {
            self.pursue(me, distance, toward, jump_ready, now, tunables)
        } else if opponent.is_attacking && distance < tunables.dodge_range * 0.5 && jump_ready {
            self.last_jump = Some(now);
            AiDecision {
                rule: AiRule::ReactiveDodge,
                steering: Steering {
                    movement: Movement::Toward {
                        direction: -toward,
                        factor: tunables.retreat_speed_factor,
                    },
                    jump: true,
                    ..Steering::IDLE
                },
            }
        } else if let Some(kind) = self.roll_attack(me, distance, now, tunables, rng) {
            AiDecision {
                rule: AiRule::OpportunisticAttack,
                steering: Steering {
                    attack: Some(kind),
                    ..Steering::IDLE
                },
            }
        } else if distance <= tunables.follow_range {
            self.approach(distance, toward, jump_ready, now, tunables, rng)
        } else {
            AiDecision {
                rule: AiRule::Idle,
                steering: Steering {
                    movement: Movement::Stop,
                    ..Steering::IDLE
                },
            }
        };

        trace!(rule = ?decision.rule, distance, "ai decision");
        decision
    }

    fn pursue(
        &mut self,
        me: &SelfView,
        distance: f32,
        toward: f32,
        jump_ready: bool,
        now: Millis,
        tunables: &AiTunables,
    ) -> AiDecision {
        let mut steering = Steering {
            movement: Movement::Toward {
                direction: toward,
                factor: tunables.pursuit_speed_factor,
            },
            ..Steering::IDLE
        };

        if distance <= tunables.attack_range && !me.is_attacking {
            steering.attack = Some(AttackKind::Primary);
        } else if distance > tunables.attack_range * 2.0 && jump_ready {
            steering.jump = true;
            self.last_jump = Some(now);
        }

        AiDecision {
            rule: AiRule::ForcedPursuit,
            steering,
        }
    }

    fn roll_attack(
        &mut self,
        me: &SelfView,
        distance: f32,
        now: Millis,
        tunables: &AiTunables,
        rng: &mut dyn RandomSource,
    ) -> Option<AttackKind> {
        let eligible = distance <= tunables.attack_range
            && !me.is_attacking
            && now.elapsed_beyond(self.last_attack, tunables.attack_cooldown);
        if !eligible || !rng.chance(tunables.attack_probability) {
            return None;
        }

        self.last_attack = Some(now);
        if rng.next_unit() > tunables.secondary_attack_share {
            Some(AttackKind::Primary)
        } else {
            Some(AttackKind::Secondary)
        }
    }

    fn approach(
        &mut self,
        distance: f32,
        toward: f32,
        jump_ready: bool,
        now: Millis,
        tunables: &AiTunables,
        rng: &mut dyn RandomSource,
    ) -> AiDecision {
        let factor = if distance < tunables.attack_range * 1.5 {
            tunables.close_approach_factor
        } else {
            tunables.far_approach_factor
        };

        let hop = rng.chance(tunables.hop_probability) && jump_ready;
        if hop {
            self.last_jump = Some(now);
        }

        AiDecision {
            rule: AiRule::Approach,
            steering: Steering {
                movement: Movement::Toward {
                    direction: toward,
                    factor,
                },
                jump: hop,
                ..Steering::IDLE
            },
        }
    }
}
