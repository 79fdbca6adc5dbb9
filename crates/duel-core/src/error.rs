//! Error types.
//!
//! Nothing that happens during a duel is an error: refused attacks, dodged or
//! blocked hits are silent no-ops observable through accessors. Errors only
//! come out of construction and configuration loading.

use thiserror::Error;

/// Construction and configuration failures.
#[derive(Debug, Error)]
pub enum DuelError {
    /// Fighter stats violate `0 <= current_health <= max_health` or have no health.
    #[error("invalid fighter stats: {0}")]
    InvalidStats(String),

    /// A tunable is negative, non-finite or otherwise unusable.
    #[error("invalid tunable `{field}`: {reason}")]
    InvalidTunable {
        /// Dotted path of the offending field
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A configuration document could not be parsed.
    #[error("malformed duel config: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("failed to read duel config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fallible construction.
pub type DuelResult<T> = Result<T, DuelError>;
