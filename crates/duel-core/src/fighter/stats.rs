//! Fighter stat block.

use serde::{Deserialize, Serialize};

use crate::error::{DuelError, DuelResult};

/// Raw combat stats of one fighter.
///
/// All values are non-negative integers. Agility is unbounded in practice
/// (see [`FighterStats::boss`]), so everything derived from it is computed in
/// `f64` by [`crate::combat`] and clamped only where the formulas say so.
///
/// # Invariants
///
/// - `max_health > 0`
/// - `current_health <= max_health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterStats {
    /// Adds damage to every attack
    pub strength: u64,
    /// Drives crit chance, dodge chance, cooldown and move speed
    pub agility: u64,
    /// Absorbs incoming damage
    pub defense: u64,
    /// Health at the start of a round
    pub max_health: u64,
    /// Health right now
    pub current_health: u64,
}

impl Default for FighterStats {
    /// The stock player build.
    ///
    /// Agility 15 000 is far past every threshold: crits are guaranteed, the
    /// dodge chance sits at its 50% cap and the cooldown is at its floor.
    /// Kept as shipped; see [`FighterStats::boss`].
    fn default() -> Self {
        Self::new(20, 15_000, 10, 100)
    }
}

impl FighterStats {
    /// Creates a stat block at full health.
    #[must_use]
    pub const fn new(strength: u64, agility: u64, defense: u64, max_health: u64) -> Self {
        Self {
            strength,
            agility,
            defense,
            max_health,
            current_health: max_health,
        }
    }

    /// The stock AI opponent build.
    ///
    /// The shipped game gave this fighter an agility of roughly 1e190, which
    /// makes its move speed absurd and its crit roll a certainty. That looks
    /// like a debugging leftover rather than tuning, but it is reproduced
    /// here (saturated to `u64::MAX`) rather than silently fixed. Use
    /// [`FighterStats::new`] for a sane opponent.
    #[must_use]
    pub const fn boss() -> Self {
        Self::new(500, u64::MAX, 8_000, 120)
    }

    /// Checks the health invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidStats`] when `max_health` is zero or
    /// `current_health` exceeds it.
    pub fn validate(&self) -> DuelResult<()> {
        if self.max_health == 0 {
            return Err(DuelError::InvalidStats(
                "max_health must be greater than zero".to_string(),
            ));
        }
        if self.current_health > self.max_health {
            return Err(DuelError::InvalidStats(format!(
                "current_health {} exceeds max_health {}",
                self.current_health, self.max_health
            )));
        }
        Ok(())
    }

    /// Refills health to the maximum.
    pub fn restore(&mut self) {
        self.current_health = self.max_health;
    }

    /// Current health as a fraction of the maximum, for health bars.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.current_health as f64 / self.max_health as f64) as f32
    }

    /// Returns `true` once health has reached zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current_health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_full_health() {
        let stats = FighterStats::new(1, 2, 3, 80);
        assert_eq!(stats.current_health, 80);
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn stock_builds_validate() {
        assert!(FighterStats::default().validate().is_ok());
        assert!(FighterStats::boss().validate().is_ok());
        assert_eq!(FighterStats::boss().max_health, 120);
    }

    #[test]
    fn overfull_health_rejected() {
        let stats = FighterStats {
            current_health: 101,
            ..FighterStats::new(0, 0, 0, 100)
        };
        assert!(matches!(stats.validate(), Err(DuelError::InvalidStats(_))));
    }

    #[test]
    fn zero_max_health_rejected() {
        assert!(FighterStats::new(1, 1, 1, 0).validate().is_err());
    }

    #[test]
    fn health_fraction_tracks_damage() {
        let mut stats = FighterStats::new(0, 0, 0, 200);
        stats.current_health = 50;
        assert!((stats.health_fraction() - 0.25).abs() < 1e-6);
        stats.restore();
        assert!((stats.health_fraction() - 1.0).abs() < 1e-6);
    }
}
