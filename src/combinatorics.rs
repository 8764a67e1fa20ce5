//! Dice combinatorics: every roll, every keepers multiset, and the adjacency
//! between them.
//!
//! [`Combinatorics::new`] builds all tables in dependency order:
//!
//! 1. **Dice by size**: sorted multisets of 0..=5 dice (1, 6, 21, 56, 126, 252)
//! 2. **All rolls**: the 252 multisets of exactly 5 dice, R_{5,6}
//! 3. **All keepers**: the 462 multisets of 0..=5 dice, sizes concatenated
//! 4. **Keepers of each roll**: powerset of the roll, deduplicated by [`DiceKey`]
//! 5. **Rolls of each keepers**: keepers completed by every multiset of `5 - k` dice
//!
//! The tables depend only on the game constants, so they are built once and
//! shared read-only for the process lifetime (see [`Combinatorics::shared`]).
//! Nothing is filled lazily, which keeps concurrent readers lock-free.
//!
//! ## Enumeration order
//!
//! Keepers of a roll are listed by increasing size, then lexicographically on
//! their sorted dice. Advice ties are broken in favour of the later keepers in
//! this order, so it is part of the observable behaviour.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::debug;

use crate::constants::*;
use crate::dice_key::DiceKey;
use crate::dice_map::DiceMap;
use crate::dice_mechanics::{sort_dice, validate_dice, validate_roll};
use crate::error::{AdvisorError, Result};

/// Precomputed rolls, keepers and their adjacency lists.
pub struct Combinatorics {
    /// dice_by_size[n]: all sorted multisets of n dice, lexicographic.
    dice_by_size: Vec<Vec<Vec<u8>>>,
    /// R_{5,6}: all 252 sorted 5-dice multisets.
    all_rolls: Vec<Vec<u8>>,
    /// R_k: all 462 keepers multisets, by size then lexicographic.
    all_keepers: Vec<Vec<u8>>,
    /// Sub-multisets of each roll, in enumeration order.
    keepers_of_roll: DiceMap<Vec<Vec<u8>>>,
    /// 5-dice completions of each keepers multiset.
    rolls_of_keepers: DiceMap<Vec<Vec<u8>>>,
}

impl Default for Combinatorics {
    fn default() -> Self {
        Self::new()
    }
}

impl Combinatorics {
    pub fn new() -> Self {
        let start = Instant::now();

        let dice_by_size: Vec<Vec<Vec<u8>>> = (0..=NUM_DICE).map(generate_dice).collect();
        let all_rolls = dice_by_size[NUM_DICE].clone();
        let all_keepers: Vec<Vec<u8>> = dice_by_size.iter().flatten().cloned().collect();

        let mut keepers_of_roll = DiceMap::with_capacity(NUM_DICE_SETS);
        for roll in &all_rolls {
            keepers_of_roll.insert(roll, generate_keepers(roll));
        }

        let mut rolls_of_keepers = DiceMap::with_capacity(NUM_KEEP_MULTISETS);
        for keepers in &all_keepers {
            let completions = &dice_by_size[NUM_DICE - keepers.len()];
            rolls_of_keepers.insert(keepers, generate_rolls(keepers, completions));
        }

        let edges: usize = rolls_of_keepers.iter().map(|(_, rolls)| rolls.len()).sum();
        debug!(
            rolls = all_rolls.len(),
            keepers = all_keepers.len(),
            edges,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "combinatorics tables built"
        );

        Self {
            dice_by_size,
            all_rolls,
            all_keepers,
            keepers_of_roll,
            rolls_of_keepers,
        }
    }

    /// Process-wide instance, built on first call.
    pub fn shared() -> Arc<Combinatorics> {
        static SHARED: OnceLock<Arc<Combinatorics>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Combinatorics::new())).clone()
    }

    /// All 252 distinct rolls of 5 dice.
    pub fn all_rolls(&self) -> &[Vec<u8>] {
        &self.all_rolls
    }

    /// All 462 keepers multisets of 0 to 5 dice.
    pub fn all_keepers(&self) -> &[Vec<u8>] {
        &self.all_keepers
    }

    /// All sorted multisets of exactly `size` dice, or `None` above 5.
    pub fn dice_of_size(&self, size: usize) -> Option<&[Vec<u8>]> {
        self.dice_by_size.get(size).map(Vec::as_slice)
    }

    /// Every distinct sub-multiset of a 5-dice roll, empty and full included.
    pub fn get_keepers(&self, roll: &[u8]) -> Result<&[Vec<u8>]> {
        validate_roll(roll)?;
        let key = DiceKey::from_dice(roll);
        self.keepers_of_key(&key).ok_or_else(|| AdvisorError::IncompleteLayer {
            layer: "combinatorics keepers",
            key: key.to_string(),
        })
    }

    /// Every 5-dice roll reachable by rolling the dice not in `keepers`.
    pub fn get_rolls(&self, keepers: &[u8]) -> Result<&[Vec<u8>]> {
        validate_dice(keepers)?;
        let key = DiceKey::from_dice(keepers);
        self.rolls_of_key(&key).ok_or_else(|| AdvisorError::IncompleteLayer {
            layer: "combinatorics rolls",
            key: key.to_string(),
        })
    }

    #[inline]
    pub(crate) fn keepers_of_key(&self, roll: &DiceKey) -> Option<&[Vec<u8>]> {
        self.keepers_of_roll.get_key(roll).map(Vec::as_slice)
    }

    #[inline]
    pub(crate) fn rolls_of_key(&self, keepers: &DiceKey) -> Option<&[Vec<u8>]> {
        self.rolls_of_keepers.get_key(keepers).map(Vec::as_slice)
    }
}

/// Enumerate all sorted multisets of `size` dice from {1..6}, lexicographic.
pub fn generate_dice(size: usize) -> Vec<Vec<u8>> {
    fn extend(prefix: &mut Vec<u8>, remaining: usize, min_face: u8, out: &mut Vec<Vec<u8>>) {
        if remaining == 0 {
            out.push(prefix.clone());
            return;
        }
        for face in min_face..=NUM_FACES as u8 {
            prefix.push(face);
            extend(prefix, remaining - 1, face, out);
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    extend(&mut Vec::with_capacity(size), size, 1, &mut out);
    out
}

/// All subsequences of `dice`, by position. Duplicates are kept.
pub fn powerset(dice: &[u8]) -> Vec<Vec<u8>> {
    (0u32..(1 << dice.len()))
        .map(|mask| {
            dice.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &d)| d)
                .collect()
        })
        .collect()
}

/// Distinct sub-multisets of `roll`, sorted, by size then lexicographic.
pub fn generate_keepers(roll: &[u8]) -> Vec<Vec<u8>> {
    let mut seen = HashSet::new();
    let mut keepers: Vec<Vec<u8>> = powerset(roll)
        .into_iter()
        .filter(|subset| seen.insert(DiceKey::from_dice(subset)))
        .map(|subset| sort_dice(&subset))
        .collect();
    keepers.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    keepers
}

/// `keepers` followed by each completion. Completions of one size are already
/// distinct multisets, so the concatenations are distinct too.
pub fn generate_rolls(keepers: &[u8], completions: &[Vec<u8>]) -> Vec<Vec<u8>> {
    completions
        .iter()
        .map(|rest| {
            let mut roll = Vec::with_capacity(NUM_DICE);
            roll.extend_from_slice(keepers);
            roll.extend_from_slice(rest);
            roll
        })
        .collect()
}
