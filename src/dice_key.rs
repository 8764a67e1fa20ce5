//! Canonical key for an unordered dice multiset.
//!
//! A [`DiceKey`] is the face-count vector of a dice collection: slot `i` holds
//! the number of dice showing face `i + 1`. Two dice sequences are "the same
//! dice" exactly when their keys are equal, whatever order the dice are in.

use std::fmt;

use crate::constants::NUM_FACES;
use crate::dice_mechanics::is_valid_die;

/// Face-count vector `[n1, n2, n3, n4, n5, n6]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiceKey([u8; NUM_FACES]);

impl DiceKey {
    /// The empty multiset.
    pub const EMPTY: DiceKey = DiceKey([0; NUM_FACES]);

    /// Build a key from dice values in 1..=6. Order does not matter.
    ///
    /// Callers validate faces first; an out-of-range face is a programming error.
    pub fn from_dice(dice: &[u8]) -> Self {
        let mut counts = [0u8; NUM_FACES];
        for &d in dice {
            debug_assert!((1..=6).contains(&d), "die face out of range: {d}");
            counts[(d - 1) as usize] += 1;
        }
        DiceKey(counts)
    }

    /// Like [`DiceKey::from_dice`], but `None` when any face is outside 1..=6.
    pub fn try_from_dice(dice: &[u8]) -> Option<Self> {
        dice.iter()
            .all(|&d| is_valid_die(d))
            .then(|| DiceKey::from_dice(dice))
    }

    pub fn counts(&self) -> &[u8; NUM_FACES] {
        &self.0
    }

    /// Number of dice showing `face` (1..=6).
    #[inline(always)]
    pub fn count(&self, face: u8) -> u8 {
        self.0[(face - 1) as usize]
    }

    /// Total number of dice.
    pub fn len(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Dice in ascending order.
    pub fn to_dice(&self) -> Vec<u8> {
        let mut dice = Vec::with_capacity(self.len());
        for (i, &c) in self.0.iter().enumerate() {
            for _ in 0..c {
                dice.push(i as u8 + 1);
            }
        }
        dice
    }

    /// True when every face count is at most the matching count in `other`.
    pub fn is_subset_of(&self, other: &DiceKey) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// Multiset difference: for each face remove `min(count_other, count_self)`.
    pub fn saturating_sub(&self, other: &DiceKey) -> DiceKey {
        let mut counts = self.0;
        for (c, &o) in counts.iter_mut().zip(other.0.iter()) {
            *c = c.saturating_sub(o);
        }
        DiceKey(counts)
    }

    /// Multiset union by count addition.
    pub fn union(&self, other: &DiceKey) -> DiceKey {
        let mut counts = self.0;
        for (c, &o) in counts.iter_mut().zip(other.0.iter()) {
            *c += o;
        }
        DiceKey(counts)
    }
}

impl fmt::Display for DiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<&[u8]> for DiceKey {
    fn from(dice: &[u8]) -> Self {
        DiceKey::from_dice(dice)
    }
}

impl From<&Vec<u8>> for DiceKey {
    fn from(dice: &Vec<u8>) -> Self {
        DiceKey::from_dice(dice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_invariant() {
        let a = DiceKey::from_dice(&[1, 2, 3, 4, 5]);
        let b = DiceKey::from_dice(&[5, 3, 1, 4, 2]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "111110");
    }

    #[test]
    fn test_differing_counts_differ() {
        let a = DiceKey::from_dice(&[1, 1, 2, 3, 4]);
        let b = DiceKey::from_dice(&[1, 2, 2, 3, 4]);
        assert_ne!(a, b);
        assert_ne!(DiceKey::from_dice(&[6]), DiceKey::from_dice(&[6, 6]));
    }

    #[test]
    fn test_empty() {
        let k = DiceKey::from_dice(&[]);
        assert_eq!(k, DiceKey::EMPTY);
        assert!(k.is_empty());
        assert_eq!(k.len(), 0);
        assert_eq!(k.to_string(), "000000");
    }

    #[test]
    fn test_to_dice_sorted() {
        let k = DiceKey::from_dice(&[6, 2, 6, 1, 2]);
        assert_eq!(k.to_dice(), vec![1, 2, 2, 6, 6]);
        assert_eq!(k.count(6), 2);
        assert_eq!(k.count(3), 0);
        assert_eq!(k.len(), 5);
    }

    #[test]
    fn test_subset_and_subtract() {
        let roll = DiceKey::from_dice(&[1, 1, 2, 3, 3]);
        let keep = DiceKey::from_dice(&[1, 3]);
        assert!(keep.is_subset_of(&roll));
        assert!(!DiceKey::from_dice(&[2, 2]).is_subset_of(&roll));
        assert_eq!(roll.saturating_sub(&keep), DiceKey::from_dice(&[1, 2, 3]));
        // Faces missing from the left-hand side are clamped at zero.
        assert_eq!(
            keep.saturating_sub(&DiceKey::from_dice(&[4, 4])),
            keep
        );
        assert_eq!(keep.union(&DiceKey::from_dice(&[1, 2, 3])), roll);
    }

    #[test]
    fn test_try_from_dice_rejects_bad_faces() {
        assert_eq!(
            DiceKey::try_from_dice(&[3, 1, 3]),
            Some(DiceKey::from_dice(&[1, 3, 3]))
        );
        assert_eq!(DiceKey::try_from_dice(&[]), Some(DiceKey::EMPTY));
        assert_eq!(DiceKey::try_from_dice(&[0]), None);
        assert_eq!(DiceKey::try_from_dice(&[1, 7]), None);
    }
}
