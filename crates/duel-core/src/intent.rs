//! Control intents.
//!
//! A human fighter receives an [`Intent`] set from the host every tick. The AI
//! policy produces a [`Steering`] that uses the same vocabulary plus the speed
//! factors the policy needs (pursuit, retreat, cautious approach).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Buttons held (or edges seen) this tick.
    ///
    /// `JUMP` is edge-triggered: the host sets it only on the tick the jump
    /// input goes down. `JUMP_RELEASED` is set on the tick it goes up.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Intent: u8 {
        /// Move toward the left wall
        const LEFT = 1 << 0;
        /// Move toward the right wall
        const RIGHT = 1 << 1;
        /// Jump (edge)
        const JUMP = 1 << 2;
        /// Jump input released (edge)
        const JUMP_RELEASED = 1 << 3;
        /// Primary attack held
        const ATTACK_PRIMARY = 1 << 4;
        /// Secondary attack held
        const ATTACK_SECONDARY = 1 << 5;
    }
}

/// Which attack a fighter tries to start.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Regular attack; becomes a stage-2 combo inside the combo window
    Primary,
    /// The combo finisher, always stage 2
    Secondary,
}

/// Horizontal control for one tick.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    /// Leave horizontal velocity as it is
    Hold,
    /// Zero horizontal velocity
    Stop,
    /// Move in `direction` (`-1.0` left, `1.0` right) at `factor` × move speed
    Toward {
        /// Sign of the motion
        direction: f32,
        /// Multiplier on the fighter's move speed
        factor: f32,
    },
}

/// A resolved control decision, from either a human [`Intent`] or the AI.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Steering {
    /// Horizontal control
    pub movement: Movement,
    /// Start a jump this tick
    pub jump: bool,
    /// Cut an ongoing jump short
    pub jump_released: bool,
    /// Attack to attempt this tick
    pub attack: Option<AttackKind>,
}

impl Steering {
    /// No input at all; horizontal velocity is left untouched.
    pub const IDLE: Self = Self {
        movement: Movement::Hold,
        jump: false,
        jump_released: false,
        attack: None,
    };

    /// Translates held buttons into steering.
    ///
    /// Horizontal buttons map to full move speed and no button means stop.
    /// `LEFT` wins when both directions are held. The primary attack takes
    /// precedence over the secondary one.
    ///
    /// # Example
    ///
    /// ```
    /// use duel_core::intent::{AttackKind, Intent, Movement, Steering};
    ///
    /// let steering = Steering::from_intent(Intent::RIGHT | Intent::ATTACK_SECONDARY);
    /// assert_eq!(steering.movement, Movement::Toward { direction: 1.0, factor: 1.0 });
    /// assert_eq!(steering.attack, Some(AttackKind::Secondary));
    /// ```
    #[must_use]
    pub fn from_intent(intent: Intent) -> Self {
        let movement = if intent.contains(Intent::LEFT) {
            Movement::Toward {
                direction: -1.0,
                factor: 1.0,
            }
        } else if intent.contains(Intent::RIGHT) {
            Movement::Toward {
                direction: 1.0,
                factor: 1.0,
            }
        } else {
            Movement::Stop
        };

        let attack = if intent.contains(Intent::ATTACK_PRIMARY) {
            Some(AttackKind::Primary)
        } else if intent.contains(Intent::ATTACK_SECONDARY) {
            Some(AttackKind::Secondary)
        } else {
            None
        };

        Self {
            movement,
            jump: intent.contains(Intent::JUMP),
            jump_released: intent.contains(Intent::JUMP_RELEASED),
            attack,
        }
    }
}

impl Default for Steering {
    fn default() -> Self {
        Self::IDLE
    }
}
