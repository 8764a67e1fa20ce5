//! Error types for the advisor boundary and the state-table storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing a state-value table.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access state map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed state map JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scorecard key {0:?}: expected 15 characters of '0' or '1'")]
    InvalidScorecard(String),
    #[error("invalid upper score key {0:?} for scorecard {1}")]
    InvalidUpperScore(String, String),
    #[error("EV {ev} for scorecard {scorecard} upper score {upper_score} is outside [0, 404]")]
    InvalidEv {
        scorecard: String,
        upper_score: u8,
        ev: f64,
    },
    #[error("scorecard {scorecard} has conflicting EVs {first} and {second} for upper score 63")]
    ConflictingEv {
        scorecard: String,
        first: f64,
        second: f64,
    },
}

/// Errors surfaced by advisory operations.
///
/// Everything except [`AdvisorError::IncompleteLayer`] is a caller error
/// detected at the public boundary.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("invalid dice {dice:?}: {reason}")]
    InvalidDice { dice: Vec<u8>, reason: &'static str },
    #[error("invalid scorecard: {0}")]
    InvalidScorecard(String),
    #[error("invalid upper score {0}: must be non-negative")]
    InvalidUpperScore(i32),
    #[error("invalid rolls left {0}: must be 1 or 2")]
    InvalidRollsLeft(u8),
    #[error("invalid category {0}: must be in 0..15")]
    InvalidCategory(usize),
    #[error("scorecard has no unmarked category")]
    FullScorecard,
    #[error("advisor used before init: no state-value table bound")]
    Uninitialized,
    #[error("state-value table has no entry for scorecard {scorecard} upper score {upper_score}")]
    MissingStateValue { scorecard: String, upper_score: u8 },
    #[error("{layer} layer has no EV for dice key {key}")]
    IncompleteLayer { layer: &'static str, key: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = AdvisorError> = std::result::Result<T, E>;
