//! State-value table: expected final score under optimal play for every
//! (scorecard, upper score) state at the start of a turn.
//!
//! The advisor only reads the table through [`StateValueLookup`]. [`StateMap`]
//! is the in-memory implementation, persisted as JSON:
//!
//! ```text
//! { "010100000000000": { "0": 212.4, "23": 230.1, "63": 261.9 }, ... }
//! ```
//!
//! Outer keys are 15-character scorecards, inner keys are upper scores capped
//! at 63. Every upper score at or above 63 is the same state, so storing and
//! looking up both cap before touching the map. Loading accepts inner keys
//! above 63 only when all keys that collapse onto 63 agree on the EV.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::constants::{cap_upper_score, MAX_EV};
use crate::error::StorageError;
use crate::scorecard::Scorecard;

/// Read access to per-state expected values.
pub trait StateValueLookup: Send + Sync {
    /// EV of the state, or `None` if the table has no entry for it.
    fn lookup(&self, scorecard: &Scorecard, upper_score: u32) -> Option<f64>;
}

impl<F> StateValueLookup for F
where
    F: Fn(&Scorecard, u32) -> Option<f64> + Send + Sync,
{
    fn lookup(&self, scorecard: &Scorecard, upper_score: u32) -> Option<f64> {
        self(scorecard, upper_score)
    }
}

type JsonTable = BTreeMap<String, BTreeMap<String, f64>>;

/// In-memory state-value table keyed by (scorecard, capped upper score).
#[derive(Clone, Debug, Default)]
pub struct StateMap {
    values: HashMap<(Scorecard, u8), f64>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the EV of a state. Upper scores above 63 overwrite the 63 entry.
    pub fn store(&mut self, scorecard: Scorecard, upper_score: u32, ev: f64) {
        self.values
            .insert((scorecard, cap_upper_score(upper_score)), ev);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse and validate the JSON table format.
    pub fn from_json_str(json: &str) -> Result<Self, StorageError> {
        let raw: JsonTable = serde_json::from_str(json)?;
        let mut map = StateMap::new();
        for (card_key, uppers) in &raw {
            let scorecard: Scorecard = card_key
                .parse()
                .map_err(|_| StorageError::InvalidScorecard(card_key.clone()))?;
            for (upper_key, &ev) in uppers {
                let upper_score: u32 = upper_key.parse().map_err(|_| {
                    StorageError::InvalidUpperScore(upper_key.clone(), card_key.clone())
                })?;
                if !ev.is_finite() || !(0.0..=MAX_EV).contains(&ev) {
                    return Err(StorageError::InvalidEv {
                        scorecard: card_key.clone(),
                        upper_score: cap_upper_score(upper_score),
                        ev,
                    });
                }
                let capped = cap_upper_score(upper_score);
                if let Some(&first) = map.values.get(&(scorecard, capped)) {
                    if first != ev {
                        return Err(StorageError::ConflictingEv {
                            scorecard: card_key.clone(),
                            first,
                            second: ev,
                        });
                    }
                }
                map.values.insert((scorecard, capped), ev);
            }
        }
        Ok(map)
    }

    /// Serialize to the JSON table format, keys sorted for stable output.
    pub fn to_json_string(&self) -> Result<String, StorageError> {
        let mut raw = JsonTable::new();
        for ((scorecard, upper_score), &ev) in &self.values {
            raw.entry(scorecard.to_string())
                .or_default()
                .insert(upper_score.to_string(), ev);
        }
        Ok(serde_json::to_string(&raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let start = Instant::now();
        let json = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            states = map.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "loaded state map"
        );
        Ok(map)
    }

    /// Write the table, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let start = Instant::now();
        let io_err = |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json_string()?).map_err(io_err)?;
        info!(
            path = %path.display(),
            states = self.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "saved state map"
        );
        Ok(())
    }
}

impl StateValueLookup for StateMap {
    fn lookup(&self, scorecard: &Scorecard, upper_score: u32) -> Option<f64> {
        self.values
            .get(&(*scorecard, cap_upper_score(upper_score)))
            .copied()
    }
}
