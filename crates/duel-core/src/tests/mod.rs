//! Crate-level tests that drive whole duels.
//!
//! - `determinism.rs`: same seed and inputs give the same round
//! - `integration.rs`: end-to-end scenarios through [`crate::Duel`]
//! - `properties.rs`: `proptest` properties of the combat model and fighter
//! - `helpers.rs`: fixtures shared by the above

mod determinism;
mod helpers;
mod properties;

pub use helpers::*;
