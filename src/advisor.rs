//! Turn advice: which dice to keep and which category to score.
//!
//! An [`Advisor`] starts uninitialized. [`Advisor::init`] binds a state-value
//! table; every advisory call before that fails with
//! [`AdvisorError::Uninitialized`]. Binding again replaces the table.
//!
//! Keepers advice rebuilds the EV layers for the queried state on every call
//! and drops them afterwards. Only the combinatorics and probability tables
//! are shared between calls.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::combinatorics::Combinatorics;
use crate::constants::cap_upper_score;
use crate::dice_key::DiceKey;
use crate::dice_mechanics::validate_roll;
use crate::error::{AdvisorError, Result};
use crate::ev_maps::{self, EvLayer, EvMap, Layer};
use crate::game_mechanics::{update_upper_score, upper_bonus, CategoryScorer, YatzyScorer};
use crate::probability::ProbabilityModel;
use crate::scorecard::Scorecard;
use crate::state_map::{StateMap, StateValueLookup};

/// Best keepers for a roll, with the layers built to find them.
#[derive(Clone, Debug, PartialEq)]
pub struct KeepersAdvice {
    /// Sorted ascending.
    pub keepers: Vec<u8>,
    pub ev: f64,
    /// Layers in construction order, FinalRolls first.
    pub layers: Vec<Layer>,
}

pub struct Advisor {
    cmb: Arc<Combinatorics>,
    prob: Arc<ProbabilityModel>,
    scorer: Arc<dyn CategoryScorer>,
    state_table: Option<Arc<dyn StateValueLookup>>,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor {
    /// Uninitialized advisor using the standard Yatzy scoring rules.
    pub fn new() -> Self {
        Self::with_scorer(YatzyScorer)
    }

    pub fn with_scorer(scorer: impl CategoryScorer + 'static) -> Self {
        Self {
            cmb: Combinatorics::shared(),
            prob: ProbabilityModel::shared(),
            scorer: Arc::new(scorer),
            state_table: None,
        }
    }

    /// Bind the state-value table. Replaces any table bound earlier.
    pub fn init(&mut self, table: impl StateValueLookup + 'static) {
        self.state_table = Some(Arc::new(table));
    }

    /// Load a JSON state map from `path` and bind it.
    pub fn init_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let table = StateMap::load(path)?;
        self.init(table);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state_table.is_some()
    }

    /// Category maximizing immediate score plus the value of the resulting
    /// state. Ties go to the higher category index.
    pub fn best_category(
        &self,
        scorecard: &Scorecard,
        upper_score: i32,
        dice: &[u8],
    ) -> Result<usize> {
        let table = self.table()?;
        let upper_score = checked_upper_score(upper_score)?;
        validate_roll(dice)?;
        let (category, _) = self.best_category_with_ev(table, scorecard, upper_score, dice)?;
        Ok(category)
    }

    /// Best keepers for `dice` with `rolls_left` rerolls remaining this turn.
    pub fn best_keepers(
        &self,
        scorecard: &Scorecard,
        upper_score: i32,
        dice: &[u8],
        rolls_left: u8,
    ) -> Result<Vec<u8>> {
        Ok(self
            .evaluate_keepers(scorecard, upper_score, dice, rolls_left)?
            .keepers)
    }

    /// Like [`Advisor::best_keepers`], also reporting the EV and the layers built.
    pub fn evaluate_keepers(
        &self,
        scorecard: &Scorecard,
        upper_score: i32,
        dice: &[u8],
        rolls_left: u8,
    ) -> Result<KeepersAdvice> {
        let table = self.table()?;
        let upper_score = checked_upper_score(upper_score)?;
        validate_roll(dice)?;
        if !matches!(rolls_left, 1 | 2) {
            return Err(AdvisorError::InvalidRollsLeft(rolls_left));
        }
        if scorecard.is_full() {
            return Err(AdvisorError::FullScorecard);
        }

        let start = Instant::now();
        let mut layers = Vec::with_capacity(4);
        let final_rolls = self.final_rolls(table, scorecard, upper_score)?;
        layers.push(final_rolls.layer());
        let mut next = EvMap::keepers(&self.cmb, &self.prob, &final_rolls)?;
        layers.push(next.layer());
        if rolls_left == 2 {
            let rolls = EvMap::rolls(&self.cmb, &next)?;
            layers.push(rolls.layer());
            next = EvMap::keepers(&self.cmb, &self.prob, &rolls)?;
            layers.push(next.layer());
        }

        let mut best: Option<(&Vec<u8>, f64)> = None;
        for keepers in self.cmb.get_keepers(dice)? {
            let key = DiceKey::from_dice(keepers);
            let ev = next
                .get_ev_key(&key)
                .ok_or_else(|| AdvisorError::IncompleteLayer {
                    layer: next.layer().name(),
                    key: key.to_string(),
                })?;
            if best.map_or(true, |(_, best_ev)| ev >= best_ev) {
                best = Some((keepers, ev));
            }
        }
        let (keepers, ev) = best.ok_or_else(|| AdvisorError::InvalidDice {
            dice: dice.to_vec(),
            reason: "roll has no keepers",
        })?;

        debug!(
            scorecard = %scorecard,
            upper_score,
            rolls_left,
            ?keepers,
            ev,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "keepers advice"
        );
        Ok(KeepersAdvice {
            keepers: keepers.clone(),
            ev,
            layers,
        })
    }

    /// EV of a whole turn played from this state, before the first roll.
    pub fn turn_start_ev(&self, scorecard: &Scorecard, upper_score: i32) -> Result<f64> {
        let table = self.table()?;
        let upper_score = checked_upper_score(upper_score)?;
        if scorecard.is_full() {
            return Err(AdvisorError::FullScorecard);
        }
        let final_rolls = self.final_rolls(table, scorecard, upper_score)?;
        ev_maps::turn_start_ev(&self.cmb, &self.prob, &final_rolls)
    }

    /// Score `dice` in `category` and return the new scorecard, upper score and
    /// points gained including any upper bonus.
    pub fn apply_category(
        &self,
        scorecard: &Scorecard,
        upper_score: u32,
        category: usize,
        dice: &[u8],
    ) -> Result<(Scorecard, u32, f64)> {
        validate_roll(dice)?;
        if scorecard.is_marked(category) {
            return Err(AdvisorError::InvalidCategory(category));
        }
        let next = scorecard.with_marked(category)?;
        let score = self.scorer.score(category, dice);
        let new_upper = update_upper_score(upper_score, category, score);
        Ok((
            next,
            new_upper,
            score as f64 + upper_bonus(upper_score, new_upper),
        ))
    }

    fn table(&self) -> Result<&dyn StateValueLookup> {
        self.state_table
            .as_deref()
            .ok_or(AdvisorError::Uninitialized)
    }

    fn final_rolls(
        &self,
        table: &dyn StateValueLookup,
        scorecard: &Scorecard,
        upper_score: u32,
    ) -> Result<EvMap> {
        EvMap::final_rolls(&self.cmb, |roll| {
            self.best_category_with_ev(table, scorecard, upper_score, roll)
                .map(|(_, ev)| ev)
        })
    }

    /// Shared by category advice and the FinalRolls layer.
    fn best_category_with_ev(
        &self,
        table: &dyn StateValueLookup,
        scorecard: &Scorecard,
        upper_score: u32,
        dice: &[u8],
    ) -> Result<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for category in scorecard.unmarked() {
            let score = self.scorer.score(category, dice);
            let new_upper = update_upper_score(upper_score, category, score);
            let next = scorecard.with_marked(category)?;
            let future = table.lookup(&next, new_upper).ok_or_else(|| {
                AdvisorError::MissingStateValue {
                    scorecard: next.to_string(),
                    upper_score: cap_upper_score(new_upper),
                }
            })?;
            let ev = score as f64 + future + upper_bonus(upper_score, new_upper);
            if best.map_or(true, |(_, best_ev)| ev >= best_ev) {
                best = Some((category, ev));
            }
        }
        best.ok_or(AdvisorError::FullScorecard)
    }
}

fn checked_upper_score(upper_score: i32) -> Result<u32> {
    u32::try_from(upper_score).map_err(|_| AdvisorError::InvalidUpperScore(upper_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn zero_table(_: &Scorecard, _: u32) -> Option<f64> {
        Some(0.0)
    }

    fn advisor_with(scorer: impl CategoryScorer + 'static) -> Advisor {
        let mut advisor = Advisor::with_scorer(scorer);
        advisor.init(zero_table);
        advisor
    }

    /// Everything scored except `open`.
    fn only_open(open: &[usize]) -> Scorecard {
        let mut marked = [true; CATEGORY_COUNT];
        for &c in open {
            marked[c] = false;
        }
        Scorecard::from_marked(marked)
    }

    fn bonus_scorer(category: usize, _dice: &[u8]) -> u32 {
        match category {
            CATEGORY_SIXES => 3,
            CATEGORY_YATZY => 50,
            _ => 0,
        }
    }

    #[test]
    fn test_best_category_single_scoring_category() {
        let advisor = advisor_with(|category: usize, _dice: &[u8]| -> u32 {
            if category == 5 {
                10
            } else {
                0
            }
        });
        let category = advisor
            .best_category(&Scorecard::empty(), 0, &[1, 2, 3, 4, 5])
            .unwrap();
        assert_eq!(category, 5);
    }

    #[test]
    fn test_bonus_threshold_switches_choice() {
        let advisor = advisor_with(bonus_scorer);
        let card = Scorecard::empty();
        // 60 + 3 reaches 63: 3 + 50 bonus beats 50.
        assert_eq!(advisor.best_category(&card, 60, &[6, 6, 6, 6, 6]).unwrap(), CATEGORY_SIXES);
        // 59 + 3 = 62 falls short.
        assert_eq!(advisor.best_category(&card, 59, &[6, 6, 6, 6, 6]).unwrap(), CATEGORY_YATZY);
        // Bonus already earned.
        assert_eq!(advisor.best_category(&card, 63, &[6, 6, 6, 6, 6]).unwrap(), CATEGORY_YATZY);
    }

    #[test]
    fn test_best_category_uses_table() {
        let mut advisor = Advisor::new();
        // Leaving Yatzy open is worth more than its 55 points now.
        advisor.init(|card: &Scorecard, _: u32| {
            Some(if card.is_marked(CATEGORY_YATZY) { 0.0 } else { 100.0 })
        });
        let category = advisor
            .best_category(&Scorecard::empty(), 0, &[1, 1, 1, 1, 1])
            .unwrap();
        // Ones and Chance both reach 105; the later one wins.
        assert_eq!(category, CATEGORY_CHANCE);
    }

    #[test]
    fn test_ties_go_to_last_candidate() {
        let advisor = advisor_with(|_: usize, _: &[u8]| -> u32 { 0 });
        assert_eq!(
            advisor
                .best_category(&Scorecard::empty(), 0, &[1, 2, 3, 4, 5])
                .unwrap(),
            CATEGORY_YATZY
        );
        let keepers = advisor
            .best_keepers(&Scorecard::empty(), 0, &[3, 1, 2, 1, 5], 1)
            .unwrap();
        assert_eq!(keepers, vec![1, 1, 2, 3, 5]);
    }

    #[test]
    fn test_best_keepers_for_chance() {
        let advisor = advisor_with(YatzyScorer);
        let card = only_open(&[CATEGORY_CHANCE]);

        let one_left = advisor.evaluate_keepers(&card, 0, &[2, 6, 1, 5, 4], 1).unwrap();
        assert_eq!(one_left.keepers, vec![4, 5, 6]);
        assert!((one_left.ev - 22.0).abs() < 1e-9);

        let two_left = advisor.evaluate_keepers(&card, 0, &[2, 6, 1, 5, 4], 2).unwrap();
        assert_eq!(two_left.keepers, vec![5, 6]);
        assert!((two_left.ev - 23.75).abs() < 1e-9);

        let sixes = advisor.best_keepers(&card, 0, &[6, 6, 6, 6, 6], 2).unwrap();
        assert_eq!(sixes, vec![6, 6, 6, 6, 6]);
    }

    #[test]
    fn test_layer_tracing() {
        let advisor = advisor_with(YatzyScorer);
        let card = only_open(&[CATEGORY_CHANCE, CATEGORY_YATZY]);

        let advice = advisor.evaluate_keepers(&card, 0, &[1, 2, 3, 4, 5], 1).unwrap();
        assert_eq!(advice.layers, vec![Layer::FinalRolls, Layer::Keepers]);

        let advice = advisor.evaluate_keepers(&card, 0, &[1, 2, 3, 4, 5], 2).unwrap();
        assert_eq!(
            advice.layers,
            vec![Layer::FinalRolls, Layer::Keepers, Layer::Rolls, Layer::Keepers]
        );
    }

    #[test]
    fn test_uninitialized() {
        let advisor = Advisor::new();
        assert!(!advisor.is_initialized());
        assert!(matches!(
            advisor.best_category(&Scorecard::empty(), 0, &[1, 2, 3, 4, 5]),
            Err(AdvisorError::Uninitialized)
        ));
        assert!(matches!(
            advisor.best_keepers(&Scorecard::empty(), 0, &[1, 2, 3, 4, 5], 2),
            Err(AdvisorError::Uninitialized)
        ));
    }

    #[test]
    fn test_reinit_rebinds_table() {
        let mut advisor = Advisor::with_scorer(bonus_scorer);
        advisor.init(zero_table);
        let card = Scorecard::empty();
        assert_eq!(advisor.best_category(&card, 0, &[1, 1, 1, 1, 1]).unwrap(), CATEGORY_YATZY);
        advisor.init(|card: &Scorecard, _: u32| {
            Some(if card.is_marked(CATEGORY_YATZY) { 0.0 } else { 60.0 })
        });
        assert_eq!(advisor.best_category(&card, 0, &[1, 1, 1, 1, 1]).unwrap(), CATEGORY_SIXES);
    }

    #[test]
    fn test_full_scorecard() {
        let advisor = advisor_with(YatzyScorer);
        assert!(matches!(
            advisor.best_category(&Scorecard::full(), 0, &[1, 2, 3, 4, 5]),
            Err(AdvisorError::FullScorecard)
        ));
        assert!(matches!(
            advisor.best_keepers(&Scorecard::full(), 0, &[1, 2, 3, 4, 5], 1),
            Err(AdvisorError::FullScorecard)
        ));
    }

    #[test]
    fn test_invalid_arguments() {
        let advisor = advisor_with(YatzyScorer);
        let card = Scorecard::empty();
        assert!(matches!(
            advisor.best_category(&card, 0, &[1, 2, 3, 4]),
            Err(AdvisorError::InvalidDice { .. })
        ));
        assert!(matches!(
            advisor.best_category(&card, 0, &[1, 2, 3, 4, 7]),
            Err(AdvisorError::InvalidDice { .. })
        ));
        assert!(matches!(
            advisor.best_category(&card, -1, &[1, 2, 3, 4, 5]),
            Err(AdvisorError::InvalidUpperScore(-1))
        ));
        assert!(matches!(
            advisor.best_keepers(&card, 0, &[1, 2, 3, 4, 5], 0),
            Err(AdvisorError::InvalidRollsLeft(0))
        ));
        assert!(matches!(
            advisor.best_keepers(&card, 0, &[1, 2, 3, 4, 5], 3),
            Err(AdvisorError::InvalidRollsLeft(3))
        ));
    }

    #[test]
    fn test_missing_state_value_is_an_error() {
        let mut advisor = Advisor::new();
        advisor.init(|_: &Scorecard, _: u32| -> Option<f64> { None });
        assert!(matches!(
            advisor.best_category(&Scorecard::empty(), 0, &[1, 2, 3, 4, 5]),
            Err(AdvisorError::MissingStateValue { .. })
        ));
        assert!(matches!(
            advisor.best_keepers(&Scorecard::empty(), 0, &[1, 2, 3, 4, 5], 1),
            Err(AdvisorError::MissingStateValue { .. })
        ));
    }

    #[test]
    fn test_apply_category() {
        let advisor = Advisor::new();
        let card = Scorecard::empty();
        let (next, upper, gained) = advisor
            .apply_category(&card, 60, CATEGORY_SIXES, &[6, 6, 1, 2, 3])
            .unwrap();
        assert!(next.is_marked(CATEGORY_SIXES));
        assert_eq!(upper, 72);
        assert_eq!(gained, 62.0);
        assert!(matches!(
            advisor.apply_category(&next, upper, CATEGORY_SIXES, &[6, 6, 1, 2, 3]),
            Err(AdvisorError::InvalidCategory(CATEGORY_SIXES))
        ));
        assert!(matches!(
            advisor.apply_category(&card, 0, CATEGORY_ONES, &[7, 7, 7, 7, 7]),
            Err(AdvisorError::InvalidDice { .. })
        ));
        assert!(matches!(
            advisor.apply_category(&card, 0, CATEGORY_CHANCE, &[1, 2, 3]),
            Err(AdvisorError::InvalidDice { .. })
        ));
    }

    #[test]
    fn test_turn_start_ev_chance_only() {
        let advisor = advisor_with(YatzyScorer);
        let ev = advisor
            .turn_start_ev(&only_open(&[CATEGORY_CHANCE]), 0)
            .unwrap();
        assert!((ev - 70.0 / 3.0).abs() < 1e-9);
    }
}
