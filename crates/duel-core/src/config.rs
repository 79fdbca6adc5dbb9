//! Tunables and duel configuration.
//!
//! All constants that shape a duel live here, grouped by concern:
//!
//! - [`CombatTunables`]: stat-to-damage, cooldown, dodge and crit conversion
//! - [`TimingTunables`]: attack duration, invulnerability and combo windows
//! - [`MotionTunables`]: jump, gravity and body size
//! - [`AiTunables`]: ranges, cooldowns and probabilities for the AI policy
//! - [`StageConfig`]: floor, walls and spawn points
//!
//! [`Rules`] bundles the first four and is shared read-only by both fighters
//! through an `Arc`. [`DuelConfig`] adds the stage, round length and fighter
//! stats, and can be loaded from JSON.
//!
//! The `Default` impls reproduce the stock game tuning.
//!
//! # Example
//!
//! ```
//! use duel_core::config::DuelConfig;
//!
//! let config = DuelConfig::from_json(r#"{ "round_secs": 90 }"#).unwrap();
//! assert_eq!(config.round_secs, 90);
//! assert!((config.rules.combat.strength_multiplier - 0.8).abs() < f64::EPSILON);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{DuelError, DuelResult};
use crate::event::Side;
use crate::fighter::FighterStats;
use crate::time::Millis;

fn ensure_non_negative(field: &'static str, value: f64) -> DuelResult<()> {
    if !value.is_finite() {
        return Err(DuelError::InvalidTunable {
            field,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(DuelError::InvalidTunable {
            field,
            reason: "must not be negative",
        });
    }
    Ok(())
}

fn ensure_probability(field: &'static str, value: f64) -> DuelResult<()> {
    ensure_non_negative(field, value)?;
    if value > 1.0 {
        return Err(DuelError::InvalidTunable {
            field,
            reason: "must be a probability in [0, 1]",
        });
    }
    Ok(())
}

// =============================================================================
// Combat
// =============================================================================

/// Multipliers converting raw stats into damage, cooldown, dodge and crit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTunables {
    /// Damage added per point of strength
    pub strength_multiplier: f64,
    /// Damage absorbed per point of defense
    pub defense_multiplier: f64,
    /// Dodge percentage per point of agility (capped at 50%)
    pub dodge_multiplier: f64,
    /// Crit percentage per point of agility (not capped)
    pub crit_multiplier: f64,
    /// Damage factor applied on a critical hit
    pub crit_damage: f64,
    /// Weapon damage before strength
    pub base_weapon_damage: f64,
    /// Attack cooldown before agility
    pub base_attack_cooldown: Millis,
    /// Cooldown floor
    pub min_attack_cooldown: Millis,
    /// Cooldown removed per point of agility, in ms
    pub agility_cooldown_factor: f64,
    /// Dodge chance ceiling
    pub max_dodge_chance: f64,
    /// Horizontal speed before agility, px/s
    pub base_move_speed: f64,
    /// Speed added per point of agility, px/s
    pub agility_speed_factor: f64,
}

impl Default for CombatTunables {
    fn default() -> Self {
        Self {
            strength_multiplier: 0.8,
            defense_multiplier: 0.3,
            dodge_multiplier: 0.5,
            crit_multiplier: 0.3,
            crit_damage: 1.5,
            base_weapon_damage: 10.0,
            base_attack_cooldown: Millis::new(1_000),
            min_attack_cooldown: Millis::new(200),
            agility_cooldown_factor: 20.0,
            max_dodge_chance: 0.5,
            base_move_speed: 200.0,
            agility_speed_factor: 0.5,
        }
    }
}

impl CombatTunables {
    fn validate(&self) -> DuelResult<()> {
        ensure_non_negative("combat.strength_multiplier", self.strength_multiplier)?;
        ensure_non_negative("combat.defense_multiplier", self.defense_multiplier)?;
        ensure_non_negative("combat.dodge_multiplier", self.dodge_multiplier)?;
        ensure_non_negative("combat.crit_multiplier", self.crit_multiplier)?;
        ensure_non_negative("combat.crit_damage", self.crit_damage)?;
        ensure_non_negative("combat.base_weapon_damage", self.base_weapon_damage)?;
        ensure_non_negative("combat.agility_cooldown_factor", self.agility_cooldown_factor)?;
        ensure_probability("combat.max_dodge_chance", self.max_dodge_chance)?;
        ensure_non_negative("combat.base_move_speed", self.base_move_speed)?;
        ensure_non_negative("combat.agility_speed_factor", self.agility_speed_factor)?;
        if self.min_attack_cooldown > self.base_attack_cooldown {
            return Err(DuelError::InvalidTunable {
                field: "combat.min_attack_cooldown",
                reason: "must not exceed base_attack_cooldown",
            });
        }
        Ok(())
    }
}

// =============================================================================
// Timing
// =============================================================================

/// Fixed timers of the fighter state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTunables {
    /// How long `is_attacking` stays set after an attack starts
    pub attack_duration: Millis,
    /// How long a fighter ignores hits after one lands
    pub invulnerability: Millis,
    /// An attack started within this window of the previous one is stage 2
    pub combo_window: Millis,
}

impl Default for TimingTunables {
    fn default() -> Self {
        Self {
            attack_duration: Millis::new(200),
            invulnerability: Millis::new(500),
            combo_window: Millis::new(500),
        }
    }
}

// =============================================================================
// Motion
// =============================================================================

/// Kinematic constants. Screen coordinates: `y` grows downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTunables {
    /// Vertical velocity applied by a jump, px/s (negative is up)
    pub jump_velocity: f32,
    /// Factor applied to upward velocity when the jump input is released
    pub jump_release_damping: f32,
    /// Downward acceleration, px/s²
    pub gravity: f32,
    /// Per-axis speed ceiling, px/s
    pub max_speed: f32,
    /// Collision body size
    pub body_size: Vec2,
    /// Attack box size
    pub attack_box_size: Vec2,
    /// Horizontal distance from the body centre to the attack box centre
    pub attack_box_offset: f32,
    /// Vertical centre offset beyond which overlapping fighters stack
    /// instead of passing through each other
    pub stack_threshold: f32,
}

impl Default for MotionTunables {
    fn default() -> Self {
        Self {
            jump_velocity: -500.0,
            jump_release_damping: 0.5,
            gravity: 2_700.0,
            max_speed: 10_000.0,
            body_size: Vec2::new(50.0, 137.0),
            attack_box_size: Vec2::new(100.0, 50.0),
            attack_box_offset: 50.0,
            stack_threshold: 50.0,
        }
    }
}

impl MotionTunables {
    fn validate(&self) -> DuelResult<()> {
        ensure_non_negative("motion.gravity", f64::from(self.gravity))?;
        ensure_non_negative("motion.max_speed", f64::from(self.max_speed))?;
        ensure_non_negative("motion.stack_threshold", f64::from(self.stack_threshold))?;
        ensure_probability(
            "motion.jump_release_damping",
            f64::from(self.jump_release_damping),
        )?;
        if !self.jump_velocity.is_finite() {
            return Err(DuelError::InvalidTunable {
                field: "motion.jump_velocity",
                reason: "must be finite",
            });
        }
        if self.body_size.x <= 0.0 || self.body_size.y <= 0.0 {
            return Err(DuelError::InvalidTunable {
                field: "motion.body_size",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

// =============================================================================
// AI
// =============================================================================

/// Parameters of the rule-based AI policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTunables {
    /// Distance at which the AI attacks
    pub attack_range: f32,
    /// Distance within which the AI approaches
    pub follow_range: f32,
    /// The reactive dodge triggers below half of this distance
    pub dodge_range: f32,
    /// Minimum time between opportunistic attacks
    pub attack_cooldown: Millis,
    /// Minimum time between AI jumps
    pub jump_cooldown: Millis,
    /// Chance per tick of taking an opportunistic attack
    pub attack_probability: f64,
    /// Share of opportunistic attacks that use the secondary attack
    pub secondary_attack_share: f64,
    /// Chance per tick of hopping while approaching
    pub hop_probability: f64,
    /// Opponent inactivity that triggers forced pursuit
    pub forced_pursuit_after: Millis,
    /// Speed factor while in forced pursuit
    pub pursuit_speed_factor: f32,
    /// Speed factor of the retreat during a reactive dodge
    pub retreat_speed_factor: f32,
    /// Approach speed factor when already near attack range
    pub close_approach_factor: f32,
    /// Approach speed factor otherwise
    pub far_approach_factor: f32,
}

impl Default for AiTunables {
    fn default() -> Self {
        Self {
            attack_range: 150.0,
            follow_range: 400.0,
            dodge_range: 200.0,
            attack_cooldown: Millis::new(2_000),
            jump_cooldown: Millis::new(2_500),
            attack_probability: 0.3,
            secondary_attack_share: 0.2,
            hop_probability: 0.01,
            forced_pursuit_after: Millis::new(10_000),
            pursuit_speed_factor: 1.2,
            retreat_speed_factor: 0.7,
            close_approach_factor: 0.5,
            far_approach_factor: 0.8,
        }
    }
}

impl AiTunables {
    fn validate(&self) -> DuelResult<()> {
        ensure_non_negative("ai.attack_range", f64::from(self.attack_range))?;
        ensure_non_negative("ai.follow_range", f64::from(self.follow_range))?;
        ensure_non_negative("ai.dodge_range", f64::from(self.dodge_range))?;
        ensure_probability("ai.attack_probability", self.attack_probability)?;
        ensure_probability("ai.secondary_attack_share", self.secondary_attack_share)?;
        ensure_probability("ai.hop_probability", self.hop_probability)?;
        ensure_non_negative("ai.pursuit_speed_factor", f64::from(self.pursuit_speed_factor))?;
        ensure_non_negative("ai.retreat_speed_factor", f64::from(self.retreat_speed_factor))?;
        ensure_non_negative("ai.close_approach_factor", f64::from(self.close_approach_factor))?;
        ensure_non_negative("ai.far_approach_factor", f64::from(self.far_approach_factor))?;
        Ok(())
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Every tunable a fighter consults, shared read-only by both fighters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Stat conversion
    pub combat: CombatTunables,
    /// State machine timers
    pub timing: TimingTunables,
    /// Kinematics
    pub motion: MotionTunables,
    /// AI policy
    pub ai: AiTunables,
}

impl Rules {
    /// Checks every tunable, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidTunable`] naming the offending field.
    pub fn validate(&self) -> DuelResult<()> {
        self.combat.validate()?;
        self.motion.validate()?;
        self.ai.validate()
    }
}

// =============================================================================
// Stage
// =============================================================================

/// Floor, walls and spawn points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Distance between the left and right walls
    pub width: f32,
    /// Height of the top of the floor
    pub floor_y: f32,
    /// Horizontal distance of each spawn point from its wall
    pub spawn_inset: f32,
    /// Spawn height (fighters fall onto the floor)
    pub spawn_y: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 1_280.0,
            floor_y: 890.0,
            spawn_inset: 300.0,
            spawn_y: 800.0,
        }
    }
}

impl StageConfig {
    /// Spawn point of the left-hand fighter.
    #[must_use]
    pub fn left_spawn(&self) -> Vec2 {
        Vec2::new(self.spawn_inset, self.spawn_y)
    }

    /// Spawn point of the right-hand fighter.
    #[must_use]
    pub fn right_spawn(&self) -> Vec2 {
        Vec2::new(self.width - self.spawn_inset, self.spawn_y)
    }

    /// Spawn point of the fighter starting on `side`.
    #[must_use]
    pub fn spawn(&self, side: Side) -> Vec2 {
        match side {
            Side::Left => self.left_spawn(),
            Side::Right => self.right_spawn(),
        }
    }

    /// Checks that the stage is non-empty and both spawns lie on it.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidTunable`] naming the offending field.
    pub fn validate(&self) -> DuelResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(DuelError::InvalidTunable {
                field: "stage.width",
                reason: "must be positive",
            });
        }
        if !(self.spawn_inset >= 0.0 && self.spawn_inset * 2.0 <= self.width) {
            return Err(DuelError::InvalidTunable {
                field: "stage.spawn_inset",
                reason: "spawn points must lie inside the stage",
            });
        }
        Ok(())
    }
}

// =============================================================================
// Duel
// =============================================================================

/// Everything needed to start a duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Shared tunables
    pub rules: Rules,
    /// Stage geometry
    pub stage: StageConfig,
    /// Round length in seconds
    pub round_secs: u32,
    /// Stats of the human-controlled fighter
    pub player_stats: FighterStats,
    /// Stats of the AI-controlled fighter
    pub opponent_stats: FighterStats,
    /// Hand the left fighter to the AI as well
    pub autoplay: bool,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            stage: StageConfig::default(),
            round_secs: 60,
            player_stats: FighterStats::default(),
            opponent_stats: FighterStats::boss(),
            autoplay: false,
        }
    }
}

impl DuelConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::Json`] for malformed input and the validation
    /// errors of [`DuelConfig::validate`].
    pub fn from_json(json: &str) -> DuelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks rules, stage, round length and both stat blocks.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> DuelResult<()> {
        self.rules.validate()?;
        self.stage.validate()?;
        if self.round_secs == 0 {
            return Err(DuelError::InvalidTunable {
                field: "round_secs",
                reason: "must be at least one second",
            });
        }
        self.player_stats.validate()?;
        self.opponent_stats.validate()
    }
}
