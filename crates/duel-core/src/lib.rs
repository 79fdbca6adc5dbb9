//! # Duel Core
//!
//! Deterministic combat and AI simulation for a two-fighter, side-view
//! fighting game.
//!
//! This crate owns the rules of a round: stat-driven damage and dodge math,
//! attack cooldowns and combos, a rule-based AI opponent and the countdown
//! that decides the winner. Rendering, audio and input devices live in the
//! host, which feeds [`Intent`]s in and drains [`CombatEvent`]s out.
//!
//! ## Architecture
//!
//! - **Combat model** ([`combat`]): pure functions of [`FighterStats`] and
//!   [`config::CombatTunables`]
//! - **Fighter** ([`fighter`]): per-tick state machine over a kinematic body,
//!   driven by human intents or the AI
//! - **AI policy** ([`ai`]): first-match rules over an [`OpponentView`]
//! - **Duel** ([`duel`]): owns both fighters, runs overlap, countdown and
//!   outcome
//!
//! ## Usage
//!
//! ```
//! use duel_core::{Duel, DuelConfig, Intent, Side, FRAME};
//!
//! let mut duel = Duel::new(DuelConfig::default(), 42).unwrap();
//!
//! for _ in 0..10 {
//!     duel.step(FRAME, [Some(Intent::RIGHT), None]);
//! }
//!
//! assert!(duel.fighter(Side::Left).position().x > 300.0);
//!
//! for event in duel.take_events() {
//!     // hand each event to the presentation layer
//!     let _ = event.fighter();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ai;
pub mod combat;
pub mod config;
pub mod duel;
pub mod error;
pub mod event;
pub mod fighter;
pub mod intent;
pub mod rng;
pub mod schedule;
pub mod time;

pub use ai::{AiBrain, AiDecision, AiRule, OpponentView};
pub use combat::{DamageRoll, HitOutcome};
pub use config::{DuelConfig, Rules, StageConfig};
pub use duel::{Duel, DuelPhase, FRAME};
pub use error::{DuelError, DuelResult};
pub use event::{CombatEvent, DuelOutcome, EndReason, Side};
pub use fighter::{Controller, Fighter, FighterConfig, FighterState, FighterStats};
pub use intent::{AttackKind, Intent};
pub use rng::{RandomSource, ScriptedRandom};
pub use time::Millis;

#[cfg(test)]
mod tests;
