//! Simulation time.
//!
//! The duel never reads the wall clock. The host advances time explicitly and
//! every timestamp in the crate is a [`Millis`] on that host clock, which keeps
//! cooldowns, combo windows and AI timers reproducible in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A point in time (or a duration) on the host clock, in milliseconds.
///
/// # Example
///
/// ```
/// use duel_core::time::Millis;
///
/// let start = Millis::new(1_000);
/// let later = start + Millis::new(250);
///
/// assert_eq!(later.since(start), Millis::new(250));
/// assert_eq!(start.since(later), Millis::ZERO);
/// ```
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Millis(u64);

impl Millis {
    /// The origin of the host clock.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from a raw millisecond count.
    #[must_use]
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// Creates a duration from whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000)
    }

    /// Returns the raw millisecond count.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the value in seconds, for physics integration.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1_000.0
    }

    /// Time elapsed from `earlier` to `self`, saturating at zero.
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }

    /// Returns `true` if strictly more than `window` has passed since `earlier`.
    ///
    /// A missing `earlier` timestamp means the event never happened, which
    /// always counts as elapsed.
    #[must_use]
    pub fn elapsed_beyond(self, earlier: Option<Self>, window: Self) -> bool {
        earlier.map_or(true, |t| self.since(t) > window)
    }
}

impl Add for Millis {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Millis {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<u64> for Millis {
    fn from(ms: u64) -> Self {
        Self::new(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_saturates() {
        assert_eq!(Millis::new(5).since(Millis::new(10)), Millis::ZERO);
        assert_eq!(Millis::new(10).since(Millis::new(4)), Millis::new(6));
    }

    #[test]
    fn elapsed_beyond_is_strict() {
        let now = Millis::new(2_500);
        assert!(!now.elapsed_beyond(Some(Millis::ZERO), Millis::new(2_500)));
        assert!(now.elapsed_beyond(Some(Millis::ZERO), Millis::new(2_499)));
        assert!(now.elapsed_beyond(None, Millis::new(1_000_000)));
    }

    #[test]
    fn secs_conversion() {
        assert_eq!(Millis::from_secs(60), Millis::new(60_000));
        assert!((Millis::new(16).as_secs_f32() - 0.016).abs() < 1e-6);
    }
}
