//! Probability of rolling an exact dice multiset.
//!
//! Rolling n fair dice gives 6^n equally likely ordered outcomes. The number of
//! orderings of a multiset with face counts n1..n6 is the multinomial
//! coefficient, so
//!
//! ```text
//! P(dice) = n! / (6^n * n1! * n2! * ... * n6!)
//! ```
//!
//! with P(∅) = 1. Since n ≤ 5 throughout, factorials 0!..5! suffice, and the
//! probability of each of the 462 multisets of 0..=5 dice is tabulated once.

use std::sync::{Arc, OnceLock};

use crate::combinatorics::Combinatorics;
use crate::constants::{NUM_DICE, NUM_FACES, NUM_KEEP_MULTISETS};
use crate::dice_key::DiceKey;
use crate::dice_map::DiceMap;
use crate::dice_mechanics::validate_dice;
use crate::error::Result;

/// Factorials and per-multiset probabilities, precomputed.
pub struct ProbabilityModel {
    /// factorial[n] for n in 0..=5.
    factorial: [u32; NUM_DICE + 1],
    /// P(dice) for every multiset of 0..=5 dice.
    probabilities: DiceMap<f64>,
}

impl ProbabilityModel {
    /// Tabulate the probability of every keepers-sized multiset in `cmb`.
    pub fn new(cmb: &Combinatorics) -> Self {
        let factorial = precompute_factorials();
        let mut probabilities = DiceMap::with_capacity(NUM_KEEP_MULTISETS);
        for dice in cmb.all_keepers() {
            let key = DiceKey::from_dice(dice);
            probabilities.insert_key(key, compute_probability(&factorial, &key));
        }
        Self {
            factorial,
            probabilities,
        }
    }

    /// Process-wide instance over [`Combinatorics::shared`].
    pub fn shared() -> Arc<ProbabilityModel> {
        static SHARED: OnceLock<Arc<ProbabilityModel>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(ProbabilityModel::new(&Combinatorics::shared())))
            .clone()
    }

    /// Probability of rolling exactly `dice` with `dice.len()` fair dice.
    pub fn dice_probability(&self, dice: &[u8]) -> Result<f64> {
        validate_dice(dice)?;
        Ok(self.probability_of_key(&DiceKey::from_dice(dice)))
    }

    /// Probability for a key of at most 5 dice.
    #[inline]
    pub fn probability_of_key(&self, key: &DiceKey) -> f64 {
        match self.probabilities.get_key(key) {
            Some(&p) => p,
            None => compute_probability(&self.factorial, key),
        }
    }
}

/// 0!..5! for multinomial coefficients.
pub fn precompute_factorials() -> [u32; NUM_DICE + 1] {
    let mut factorial = [1u32; NUM_DICE + 1];
    for i in 1..=NUM_DICE {
        factorial[i] = factorial[i - 1] * i as u32;
    }
    factorial
}

/// Multinomial formula: n! / (6^n * prod(count_face!)).
pub fn compute_probability(factorial: &[u32; NUM_DICE + 1], key: &DiceKey) -> f64 {
    let n = key.len();
    if n == 0 {
        return 1.0;
    }
    let denominator: f64 = key
        .counts()
        .iter()
        .map(|&c| factorial[c as usize] as f64)
        .product();
    let total_outcomes = (NUM_FACES as f64).powi(n as i32);
    factorial[n] as f64 / (total_outcomes * denominator)
}
