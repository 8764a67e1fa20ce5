//! # Yatzy Advisor: optimal keepers and category advice for Scandinavian Yatzy
//!
//! Given a partial scorecard, an upper-section score and the current dice,
//! the advisor picks the dice to keep before a reroll and the category to
//! score after the last roll. Both decisions maximize expected final score
//! under a precomputed **state-value table**: the EV of every
//! (scorecard, upper score) state at the start of a turn.
//!
//! ## Turn evaluation
//!
//! Within a turn the advisor runs backward induction over dice multisets:
//!
//! | Layer | Module | Keys | Value |
//! |-------|--------|------|-------|
//! | FinalRolls | [`ev_maps`] | 252 rolls | best score + table value over unmarked categories |
//! | Keepers | [`ev_maps`] | 462 keepers | probability-weighted EV of the completions |
//! | Rolls | [`ev_maps`] | 252 rolls | best keepers EV reachable from the roll |
//!
//! One roll left: FinalRolls → Keepers. Two rolls left: FinalRolls → Keepers →
//! Rolls → Keepers. The answer is the keepers of the current roll with the
//! highest EV in the last layer.
//!
//! ## Shared tables
//!
//! [`combinatorics::Combinatorics`] (rolls, keepers, and their adjacency) and
//! [`probability::ProbabilityModel`] depend only on the game constants. They
//! are built eagerly once per process and shared read-only through `Arc`.
//!
//! ## Tie-breaking
//!
//! Candidates are compared with `>=`, so among equal EVs the one enumerated
//! last wins: the highest category index, or the largest keepers multiset in
//! (size, lexicographic) order.

#![allow(clippy::needless_range_loop)]

pub mod advisor;
pub mod combinatorics;
pub mod constants;
pub mod dice_key;
pub mod dice_map;
pub mod dice_mechanics;
pub mod env_config;
pub mod error;
pub mod ev_maps;
pub mod game_mechanics;
pub mod probability;
pub mod scorecard;
pub mod simulation;
pub mod state_map;

pub use advisor::{Advisor, KeepersAdvice};
pub use error::{AdvisorError, Result, StorageError};
pub use scorecard::Scorecard;
pub use state_map::{StateMap, StateValueLookup};
