//! Game constants for Scandinavian Yatzy.
//!
//! Sizes of the combinatorial spaces the advisor enumerates:
//! - |R_{5,6}| = [`NUM_DICE_SETS`] = 252 distinct 5-dice rolls
//! - |R_k| = [`NUM_KEEP_MULTISETS`] = 462 keepers multisets of 0-5 dice
//! - |C| = [`CATEGORY_COUNT`] = 15 scoring categories

/// Number of dice in a full roll.
pub const NUM_DICE: usize = 5;

/// Number of faces on a die.
pub const NUM_FACES: usize = 6;

/// Number of scoring categories in Scandinavian Yatzy (Ones through Yatzy).
pub const CATEGORY_COUNT: usize = 15;

/// Number of distinct sorted 5-dice multisets from {1..6}: C(10,5) = 252.
pub const NUM_DICE_SETS: usize = 252;

/// Number of keepers multisets for 0-5 dice from {1..6}: 1+6+21+56+126+252 = 462.
pub const NUM_KEEP_MULTISETS: usize = 462;

/// Upper section bonus, awarded once when the upper score reaches 63.
pub const UPPER_BONUS: f64 = 50.0;

/// Upper score cap. Every upper score at or above this is equivalent.
pub const UPPER_SCORE_CAP: u32 = 63;

/// Largest total a game can reach: 105 upper + 50 bonus + 249 lower.
pub const MAX_EV: f64 = 404.0;

/// Extra points awarded on top of 5 x face for a Yatzy.
pub const YATZY_BONUS: u32 = 50;

/// Category indices, in scorecard order.
pub const CATEGORY_ONES: usize = 0;
pub const CATEGORY_TWOS: usize = 1;
pub const CATEGORY_THREES: usize = 2;
pub const CATEGORY_FOURS: usize = 3;
pub const CATEGORY_FIVES: usize = 4;
pub const CATEGORY_SIXES: usize = 5;
pub const CATEGORY_ONE_PAIR: usize = 6;
pub const CATEGORY_TWO_PAIRS: usize = 7;
pub const CATEGORY_THREE_OF_A_KIND: usize = 8;
pub const CATEGORY_FOUR_OF_A_KIND: usize = 9;
pub const CATEGORY_SMALL_STRAIGHT: usize = 10;
pub const CATEGORY_LARGE_STRAIGHT: usize = 11;
pub const CATEGORY_FULL_HOUSE: usize = 12;
pub const CATEGORY_CHANCE: usize = 13;
pub const CATEGORY_YATZY: usize = 14;

/// Human-readable category names.
pub const CATEGORY_NAMES: [&str; CATEGORY_COUNT] = [
    "Ones",
    "Twos",
    "Threes",
    "Fours",
    "Fives",
    "Sixes",
    "One Pair",
    "Two Pairs",
    "Three of a Kind",
    "Four of a Kind",
    "Small Straight",
    "Large Straight",
    "Full House",
    "Chance",
    "Yatzy",
];

/// Categories 0-5 (Ones through Sixes) count toward the upper bonus.
#[inline(always)]
pub fn is_upper_category(category: usize) -> bool {
    category <= CATEGORY_SIXES
}

/// Cap an upper score for state-table lookups.
#[inline(always)]
pub fn cap_upper_score(upper_score: u32) -> u8 {
    upper_score.min(UPPER_SCORE_CAP) as u8
}
