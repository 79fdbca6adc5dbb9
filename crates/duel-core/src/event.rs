//! Combat events for the presentation layer.
//!
//! The simulation never calls into rendering. Instead fighters and the duel
//! record [`CombatEvent`]s that the host drains once per frame and turns into
//! animations, sounds and health-bar updates.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::intent::AttackKind;
use crate::time::Millis;

/// Which side of the stage a fighter starts on. Doubles as its identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Starts near the left wall
    Left,
    /// Starts near the right wall
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Array index used by the duel (`Left` = 0, `Right` = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// How a round ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelOutcome {
    /// The fighter on this side finished with more health
    Winner(Side),
    /// Both fighters finished with equal health
    Tie,
}

/// Why a round ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// At least one fighter's health reached zero
    Knockout,
    /// The countdown reached zero
    TimeUp,
}

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// An attack started
    AttackStarted {
        /// Attacking fighter
        fighter: Side,
        /// Attack requested
        kind: AttackKind,
        /// Combo stage chosen (1 or 2)
        stage: u8,
        /// When it started
        at: Millis,
    },
    /// The attack window closed
    AttackEnded {
        /// Fighter whose attack ended
        fighter: Side,
        /// When it ended
        at: Millis,
    },
    /// A hit got through
    HitLanded {
        /// Fighter that was hit
        defender: Side,
        /// Damage after defense
        damage: u64,
        /// Whether the attacker rolled a critical
        critical: bool,
        /// Defender health after the hit
        remaining: u64,
    },
    /// The defender dodged
    HitDodged {
        /// Fighter that dodged
        defender: Side,
    },
    /// The invulnerability window after a hit closed
    Vulnerable {
        /// Fighter that can be hit again
        fighter: Side,
    },
    /// A fighter's health reached zero
    Died {
        /// Fighter that died
        fighter: Side,
        /// Where it fell
        position: Vec2,
    },
    /// A fighter jumped
    Jumped {
        /// Fighter that jumped
        fighter: Side,
    },
    /// A fighter was restored for a new round
    Reset {
        /// Fighter that was reset
        fighter: Side,
    },
    /// One second of the round elapsed
    Countdown {
        /// Seconds left on the clock
        remaining_secs: u32,
    },
    /// The round is over
    DuelEnded {
        /// Result
        outcome: DuelOutcome,
        /// Cause
        reason: EndReason,
    },
}

impl CombatEvent {
    /// The fighter this event concerns, if any.
    #[must_use]
    pub fn fighter(&self) -> Option<Side> {
        match self {
            Self::AttackStarted { fighter, .. }
            | Self::AttackEnded { fighter, .. }
            | Self::Vulnerable { fighter }
            | Self::Died { fighter, .. }
            | Self::Jumped { fighter }
            | Self::Reset { fighter } => Some(*fighter),
            Self::HitLanded { defender, .. } | Self::HitDodged { defender } => Some(*defender),
            Self::Countdown { .. } | Self::DuelEnded { .. } => None,
        }
    }
}

/// Append-only log drained by the host.
///
/// The duel is single-threaded, so unlike a shared telemetry sink this log
/// is a plain `Vec` owned by whoever records into it.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event.
    pub fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Moves every event of `other` to the end of this log.
    pub fn absorb(&mut self, other: &mut Self) {
        self.events.append(&mut other.events);
    }

    /// Drains and returns all recorded events in recording order.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Number of events waiting to be drained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is waiting to be drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards everything without returning it.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opposite_and_index() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.index(), 1);
    }

    #[test]
    fn take_events_drains() {
        let mut log = EventLog::new();
        log.record(CombatEvent::Jumped { fighter: Side::Left });
        log.record(CombatEvent::Countdown { remaining_secs: 59 });
        assert_eq!(log.len(), 2);

        let events = log.take_events();
        assert_eq!(events.len(), 2);
        assert!(log.is_empty());
        assert_eq!(events[0].fighter(), Some(Side::Left));
        assert_eq!(events[1].fighter(), None);
    }

    #[test]
    fn absorb_preserves_order() {
        let mut a = EventLog::new();
        let mut b = EventLog::new();
        a.record(CombatEvent::Jumped { fighter: Side::Left });
        b.record(CombatEvent::Jumped { fighter: Side::Right });
        a.absorb(&mut b);
        assert!(b.is_empty());
        assert_eq!(a.events()[1].fighter(), Some(Side::Right));
    }

    #[test]
    fn events_serialize() {
        let event = CombatEvent::DuelEnded {
            outcome: DuelOutcome::Tie,
            reason: EndReason::Knockout,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CombatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
