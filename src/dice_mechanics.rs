//! Dice helpers: validation, face counting, sorting and multiset subtraction.

use crate::constants::{NUM_DICE, NUM_FACES};
use crate::error::{AdvisorError, Result};

/// Count occurrences of each face (1-6).
/// face_count[0] is unused; face_count[f] = count of face f.
pub fn count_faces(dice: &[u8]) -> [u8; NUM_FACES + 1] {
    let mut face_count = [0u8; NUM_FACES + 1];
    for &d in dice {
        face_count[d as usize] += 1;
    }
    face_count
}

/// Normalize dice to canonical sorted form (ascending).
pub fn sort_dice(dice: &[u8]) -> Vec<u8> {
    let mut sorted = dice.to_vec();
    sorted.sort_unstable();
    sorted
}

/// A die must show a face in 1..=6.
#[inline(always)]
pub fn is_valid_die(die: u8) -> bool {
    (1..=NUM_FACES as u8).contains(&die)
}

/// Validate a dice multiset of 0-5 dice.
pub fn validate_dice(dice: &[u8]) -> Result<()> {
    if dice.len() > NUM_DICE {
        return Err(AdvisorError::InvalidDice {
            dice: dice.to_vec(),
            reason: "more than 5 dice",
        });
    }
    if !dice.iter().all(|&d| is_valid_die(d)) {
        return Err(AdvisorError::InvalidDice {
            dice: dice.to_vec(),
            reason: "face outside 1..=6",
        });
    }
    Ok(())
}

/// Validate a full roll of exactly 5 dice.
pub fn validate_roll(dice: &[u8]) -> Result<()> {
    validate_dice(dice)?;
    if dice.len() != NUM_DICE {
        return Err(AdvisorError::InvalidDice {
            dice: dice.to_vec(),
            reason: "a roll must have exactly 5 dice",
        });
    }
    Ok(())
}

/// Remove the dice in `b` from `a`, one occurrence per die.
///
/// Dice in `b` that `a` does not contain are ignored. The remaining dice keep
/// their order from `a`.
pub fn subtract_dice(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut remaining = a.to_vec();
    for die in b {
        if let Some(pos) = remaining.iter().position(|d| d == die) {
            remaining.remove(pos);
        }
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_dice() {
        assert_eq!(sort_dice(&[5, 3, 1, 4, 2]), vec![1, 2, 3, 4, 5]);
        assert_eq!(sort_dice(&[6, 5, 4, 3, 2]), vec![2, 3, 4, 5, 6]);
        assert_eq!(sort_dice(&[3, 3, 3, 3, 3]), vec![3, 3, 3, 3, 3]);
        assert!(sort_dice(&[]).is_empty());
    }

    #[test]
    fn test_count_faces() {
        let fc = count_faces(&[1, 1, 2, 3, 3]);
        assert_eq!(fc[1], 2);
        assert_eq!(fc[2], 1);
        assert_eq!(fc[3], 2);
        assert_eq!(fc[4], 0);
        assert_eq!(fc[5], 0);
        assert_eq!(fc[6], 0);

        let fc2 = count_faces(&[6, 6, 6, 6, 6]);
        assert_eq!(fc2[6], 5);
        assert_eq!(fc2[1], 0);
    }

    #[test]
    fn test_validate_dice() {
        assert!(validate_dice(&[]).is_ok());
        assert!(validate_dice(&[1, 6]).is_ok());
        assert!(validate_dice(&[0]).is_err());
        assert!(validate_dice(&[7]).is_err());
        assert!(validate_dice(&[1, 2, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_validate_roll() {
        assert!(validate_roll(&[1, 2, 3, 4, 5]).is_ok());
        assert!(validate_roll(&[1, 2, 3, 4]).is_err());
        assert!(matches!(
            validate_roll(&[1, 2, 3, 4, 9]),
            Err(AdvisorError::InvalidDice { .. })
        ));
    }

    #[test]
    fn test_subtract_dice() {
        assert_eq!(subtract_dice(&[1, 1, 2, 3, 4], &[1, 3]), vec![1, 2, 4]);
        assert_eq!(subtract_dice(&[1, 2], &[5]), vec![1, 2]);
        assert_eq!(subtract_dice(&[2, 2, 2], &[2, 2, 2]), Vec::<u8>::new());
    }
}
