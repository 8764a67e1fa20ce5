//! Yatzy scoring rules and the upper-score successor function.
//!
//! The advisor only sees scoring through the [`CategoryScorer`] trait, so
//! alternative rule sets (or test doubles) can be plugged in. [`YatzyScorer`]
//! implements the rules the bundled state-value tables were solved for.

use crate::constants::*;
use crate::dice_mechanics::count_faces;

/// Pure, deterministic score of placing a 5-dice roll in a category.
pub trait CategoryScorer: Send + Sync {
    fn score(&self, category: usize, dice: &[u8]) -> u32;
}

/// Scandinavian Yatzy rules with a face-valued Yatzy (5 × face + 50).
#[derive(Clone, Copy, Debug, Default)]
pub struct YatzyScorer;

impl CategoryScorer for YatzyScorer {
    fn score(&self, category: usize, dice: &[u8]) -> u32 {
        calculate_category_score(dice, category)
    }
}

impl<F> CategoryScorer for F
where
    F: Fn(usize, &[u8]) -> u32 + Send + Sync,
{
    fn score(&self, category: usize, dice: &[u8]) -> u32 {
        self(category, dice)
    }
}

/// Score for placing a 5-dice roll in the given category.
///
/// Categories 0–5 are the upper section (Ones through Sixes): score = face × count.
/// Categories 6–14 are the lower section. Unknown categories score 0.
pub fn calculate_category_score(dice: &[u8], category: usize) -> u32 {
    let face_count = count_faces(dice);
    let sum_all: u32 = dice.iter().map(|&d| d as u32).sum();

    match category {
        CATEGORY_ONES | CATEGORY_TWOS | CATEGORY_THREES | CATEGORY_FOURS | CATEGORY_FIVES
        | CATEGORY_SIXES => {
            let face = category + 1;
            face_count[face] as u32 * face as u32
        }
        CATEGORY_ONE_PAIR => {
            for f in (1..=6).rev() {
                if face_count[f] >= 2 {
                    return 2 * f as u32;
                }
            }
            0
        }
        CATEGORY_TWO_PAIRS => {
            let mut total = 0;
            let mut pairs = 0;
            for f in 1..=6 {
                if face_count[f] >= 2 {
                    total += 2 * f as u32;
                    pairs += 1;
                }
            }
            if pairs == 2 {
                total
            } else {
                0
            }
        }
        CATEGORY_THREE_OF_A_KIND => n_of_a_kind_score(&face_count, 3),
        CATEGORY_FOUR_OF_A_KIND => n_of_a_kind_score(&face_count, 4),
        CATEGORY_SMALL_STRAIGHT => {
            if (1..=5).all(|f| face_count[f] == 1) {
                15
            } else {
                0
            }
        }
        CATEGORY_LARGE_STRAIGHT => {
            if (2..=6).all(|f| face_count[f] == 1) {
                20
            } else {
                0
            }
        }
        CATEGORY_FULL_HOUSE => {
            let has_three = (1..=6).any(|f| face_count[f] == 3);
            let has_pair = (1..=6).any(|f| face_count[f] == 2);
            if has_three && has_pair {
                sum_all
            } else {
                0
            }
        }
        CATEGORY_CHANCE => sum_all,
        CATEGORY_YATZY => {
            for f in 1..=6 {
                if face_count[f] == 5 {
                    return 5 * f as u32 + YATZY_BONUS;
                }
            }
            0
        }
        _ => 0,
    }
}

/// Returns face * n for the face appearing at least n times, else 0.
fn n_of_a_kind_score(face_count: &[u8; 7], n: u8) -> u32 {
    for face in 1..=6 {
        if face_count[face] >= n {
            return face as u32 * n as u32;
        }
    }
    0
}

/// Successor upper score: m' = m + score for upper categories, unchanged otherwise.
///
/// Not capped; state tables cap at lookup, and the bonus test needs the raw sum.
pub fn update_upper_score(upper_score: u32, category: usize, score: u32) -> u32 {
    if is_upper_category(category) {
        upper_score + score
    } else {
        upper_score
    }
}

/// 50 when moving from below 63 to 63 or more, else 0.
pub fn upper_bonus(upper_score: u32, new_upper_score: u32) -> f64 {
    if upper_score < UPPER_SCORE_CAP && new_upper_score >= UPPER_SCORE_CAP {
        UPPER_BONUS
    } else {
        0.0
    }
}
