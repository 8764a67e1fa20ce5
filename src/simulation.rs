//! Full-game playouts driven by the advisor.
//!
//! Each turn: roll 5 dice, keep the advised dice with two rerolls left,
//! reroll the rest, keep again with one reroll left, reroll, then score the
//! advised category. The upper bonus is added when the upper score reaches 63.
//! A batch seeds one `SmallRng` per game from `seed + game index`, so results
//! do not depend on how rayon schedules the games.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::advisor::Advisor;
use crate::constants::{CATEGORY_COUNT, NUM_DICE, NUM_FACES, UPPER_SCORE_CAP};
use crate::dice_mechanics::sort_dice;
use crate::error::Result;
use crate::scorecard::Scorecard;

/// Dice and decisions of one turn.
#[derive(Clone, Debug, Serialize)]
pub struct TurnRecord {
    pub dice_initial: Vec<u8>,
    pub keepers_first: Vec<u8>,
    pub dice_after_first_reroll: Vec<u8>,
    pub keepers_second: Vec<u8>,
    pub dice_final: Vec<u8>,
    pub category: usize,
    /// Points for the category, upper bonus included when it was earned this turn.
    pub points: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameResult {
    pub turns: Vec<TurnRecord>,
    pub total_score: u32,
    /// Uncapped upper section total.
    pub upper_score: u32,
    pub got_bonus: bool,
}

/// Results of a batch simulation.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationResult {
    pub scores: Vec<u32>,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    pub median: u32,
    #[serde(skip)]
    pub elapsed: Duration,
}

fn roll_dice<R: Rng>(rng: &mut R, count: usize) -> Vec<u8> {
    (0..count)
        .map(|_| rng.random_range(1..=NUM_FACES as u8))
        .collect()
}

/// Keep `keepers`, reroll the other dice.
fn reroll<R: Rng>(rng: &mut R, keepers: &[u8]) -> Vec<u8> {
    let mut dice = keepers.to_vec();
    dice.extend(roll_dice(rng, NUM_DICE - keepers.len()));
    sort_dice(&dice)
}

/// Play one game from an empty scorecard.
pub fn simulate_game<R: Rng>(advisor: &Advisor, rng: &mut R) -> Result<GameResult> {
    let mut scorecard = Scorecard::empty();
    let mut upper_score: u32 = 0;
    let mut total_score: u32 = 0;
    let mut turns = Vec::with_capacity(CATEGORY_COUNT);

    for _ in 0..CATEGORY_COUNT {
        let upper = upper_score as i32;

        let dice_initial = sort_dice(&roll_dice(rng, NUM_DICE));
        let keepers_first = advisor.best_keepers(&scorecard, upper, &dice_initial, 2)?;
        let dice_after_first_reroll = reroll(rng, &keepers_first);
        let keepers_second =
            advisor.best_keepers(&scorecard, upper, &dice_after_first_reroll, 1)?;
        let dice_final = reroll(rng, &keepers_second);

        let category = advisor.best_category(&scorecard, upper, &dice_final)?;
        let (next, new_upper, gained) =
            advisor.apply_category(&scorecard, upper_score, category, &dice_final)?;
        let points = gained as u32;

        scorecard = next;
        upper_score = new_upper;
        total_score += points;
        turns.push(TurnRecord {
            dice_initial,
            keepers_first,
            dice_after_first_reroll,
            keepers_second,
            dice_final,
            category,
            points,
        });
    }

    Ok(GameResult {
        turns,
        total_score,
        upper_score,
        got_bonus: upper_score >= UPPER_SCORE_CAP,
    })
}

/// Play `num_games` games in parallel. Game `i` uses seed `seed + i`.
pub fn simulate_batch(advisor: &Advisor, num_games: usize, seed: u64) -> Result<SimulationResult> {
    let start = Instant::now();

    let scores: Vec<u32> = (0..num_games)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            simulate_game(advisor, &mut rng).map(|game| game.total_score)
        })
        .collect::<Result<_>>()?;

    let elapsed = start.elapsed();
    let result = summarize(scores, elapsed);
    info!(
        games = num_games,
        mean = result.mean,
        std_dev = result.std_dev,
        elapsed_s = elapsed.as_secs_f64(),
        "simulation finished"
    );
    Ok(result)
}

fn summarize(mut scores: Vec<u32>, elapsed: Duration) -> SimulationResult {
    let n = scores.len().max(1) as f64;
    let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = scores
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let min = scores.iter().copied().min().unwrap_or(0);
    let max = scores.iter().copied().max().unwrap_or(0);
    scores.sort_unstable();
    let median = scores.get(scores.len() / 2).copied().unwrap_or(0);

    SimulationResult {
        scores,
        mean,
        std_dev: variance.sqrt(),
        min,
        max,
        median,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_EV;
    use crate::dice_key::DiceKey;

    fn greedy_advisor() -> Advisor {
        let mut advisor = Advisor::new();
        advisor.init(|_: &Scorecard, _: u32| Some(0.0));
        advisor
    }

    #[test]
    fn test_simulate_game_fills_scorecard() {
        let advisor = greedy_advisor();
        let mut rng = SmallRng::seed_from_u64(7);
        let game = simulate_game(&advisor, &mut rng).unwrap();

        assert_eq!(game.turns.len(), CATEGORY_COUNT);
        let mut categories: Vec<usize> = game.turns.iter().map(|t| t.category).collect();
        categories.sort_unstable();
        assert_eq!(categories, (0..CATEGORY_COUNT).collect::<Vec<_>>());

        let points: u32 = game.turns.iter().map(|t| t.points).sum();
        assert_eq!(points, game.total_score);
        assert!(game.total_score as f64 <= MAX_EV);
        assert_eq!(game.got_bonus, game.upper_score >= 63);
    }

    #[test]
    fn test_turn_records_are_consistent() {
        let advisor = greedy_advisor();
        let mut rng = SmallRng::seed_from_u64(11);
        let game = simulate_game(&advisor, &mut rng).unwrap();
        for turn in &game.turns {
            assert_eq!(turn.dice_initial.len(), 5);
            assert_eq!(turn.dice_final.len(), 5);
            assert!(turn.keepers_first.windows(2).all(|w| w[0] <= w[1]));
            let kept = DiceKey::from_dice(&turn.keepers_second);
            let after = DiceKey::from_dice(&turn.dice_after_first_reroll);
            assert!(kept.is_subset_of(&after));
        }
    }

    #[test]
    fn test_batch_is_reproducible() {
        let advisor = greedy_advisor();
        let a = simulate_batch(&advisor, 4, 42).unwrap();
        let b = simulate_batch(&advisor, 4, 42).unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.scores.len(), 4);
        assert!(a.min <= a.median && a.median <= a.max);
        assert!(a.mean >= a.min as f64 && a.mean <= a.max as f64);
    }

    #[test]
    fn test_uninitialized_advisor_fails() {
        let advisor = Advisor::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(simulate_game(&advisor, &mut rng).is_err());
    }

    #[test]
    fn test_summarize_empty() {
        let result = summarize(Vec::new(), Duration::ZERO);
        assert_eq!(result.median, 0);
        assert_eq!(result.mean, 0.0);
    }
}
