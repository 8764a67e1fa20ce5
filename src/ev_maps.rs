//! Backward induction over one turn.
//!
//! A turn is evaluated from its end backwards, one layer per step:
//!
//! ```text
//! FinalRolls(r)  = value of scoring roll r now
//! Keepers(k)     = Σ_{r ∈ rolls(k)} P(r − k) · next(r)
//! Rolls(r)       = max_{k ∈ keepers(r)} next(k)
//! ```
//!
//! With two rolls left the chain is FinalRolls → Keepers → Rolls → Keepers;
//! with one roll left it is FinalRolls → Keepers. Each layer is an [`EvMap`]
//! keyed by dice multiset, built in parallel from the complete layer below it.

use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::combinatorics::Combinatorics;
use crate::dice_key::DiceKey;
use crate::dice_map::DiceMap;
use crate::error::{AdvisorError, Result};
use crate::probability::ProbabilityModel;

/// Which step of the recurrence a map holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    FinalRolls,
    Keepers,
    Rolls,
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::FinalRolls => "final rolls",
            Layer::Keepers => "keepers",
            Layer::Rolls => "rolls",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A layer the next one up can read EVs from.
pub trait EvLayer: Sync {
    fn layer(&self) -> Layer;

    /// EV for `dice`, or `None` if the layer has no entry for that multiset.
    /// Faces outside 1..=6 have no entry.
    fn get_ev(&self, dice: &[u8]) -> Option<f64> {
        self.get_ev_key(&DiceKey::try_from_dice(dice)?)
    }

    fn get_ev_key(&self, key: &DiceKey) -> Option<f64>;
}

/// EVs of one layer, keyed by dice multiset.
#[derive(Clone, Debug)]
pub struct EvMap {
    layer: Layer,
    values: DiceMap<f64>,
}

impl EvMap {
    /// EV of scoring each of the 252 rolls, as given by `score_roll`.
    pub fn final_rolls<F>(cmb: &Combinatorics, score_roll: F) -> Result<Self>
    where
        F: Fn(&[u8]) -> Result<f64> + Sync,
    {
        build(Layer::FinalRolls, cmb.all_rolls(), |roll| score_roll(roll))
    }

    /// Expected EV of `next` after rerolling everything but each keepers multiset.
    pub fn keepers(
        cmb: &Combinatorics,
        prob: &ProbabilityModel,
        next: &dyn EvLayer,
    ) -> Result<Self> {
        build(Layer::Keepers, cmb.all_keepers(), |keepers| {
            let keepers_key = DiceKey::from_dice(keepers);
            let rolls = cmb
                .rolls_of_key(&keepers_key)
                .ok_or_else(|| incomplete("combinatorics rolls", &keepers_key))?;
            let mut ev = 0.0;
            for roll in rolls {
                let roll_key = DiceKey::from_dice(roll);
                let next_ev = next
                    .get_ev_key(&roll_key)
                    .ok_or_else(|| incomplete(next.layer().name(), &roll_key))?;
                ev += prob.probability_of_key(&roll_key.saturating_sub(&keepers_key)) * next_ev;
            }
            Ok(ev)
        })
    }

    /// Best EV of `next` over the keepers choices of each roll.
    pub fn rolls(cmb: &Combinatorics, next: &dyn EvLayer) -> Result<Self> {
        build(Layer::Rolls, cmb.all_rolls(), |roll| {
            let roll_key = DiceKey::from_dice(roll);
            let choices = cmb
                .keepers_of_key(&roll_key)
                .ok_or_else(|| incomplete("combinatorics keepers", &roll_key))?;
            let mut best = f64::NEG_INFINITY;
            for keepers in choices {
                let key = DiceKey::from_dice(keepers);
                let ev = next
                    .get_ev_key(&key)
                    .ok_or_else(|| incomplete(next.layer().name(), &key))?;
                if ev >= best {
                    best = ev;
                }
            }
            Ok(best)
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl EvLayer for EvMap {
    fn layer(&self) -> Layer {
        self.layer
    }

    #[inline]
    fn get_ev_key(&self, key: &DiceKey) -> Option<f64> {
        self.values.get_key(key).copied()
    }
}

/// EV of a turn before its first roll, given the FinalRolls layer of the
/// state it is played from. Three rolls: two keep decisions, then scoring.
pub fn turn_start_ev(
    cmb: &Combinatorics,
    prob: &ProbabilityModel,
    final_rolls: &EvMap,
) -> Result<f64> {
    let keepers_1 = EvMap::keepers(cmb, prob, final_rolls)?;
    let rolls_1 = EvMap::rolls(cmb, &keepers_1)?;
    let keepers_2 = EvMap::keepers(cmb, prob, &rolls_1)?;
    let first_rolls = EvMap::rolls(cmb, &keepers_2)?;

    let mut ev = 0.0;
    for roll in cmb.all_rolls() {
        let key = DiceKey::from_dice(roll);
        let roll_ev = first_rolls
            .get_ev_key(&key)
            .ok_or_else(|| incomplete(Layer::Rolls.name(), &key))?;
        ev += prob.probability_of_key(&key) * roll_ev;
    }
    Ok(ev)
}

fn build<F>(layer: Layer, keys: &[Vec<u8>], ev_of: F) -> Result<EvMap>
where
    F: Fn(&[u8]) -> Result<f64> + Sync,
{
    let start = Instant::now();
    let entries = keys
        .par_iter()
        .map(|dice| -> Result<(DiceKey, f64)> {
            Ok((DiceKey::from_dice(dice), ev_of(dice)?))
        })
        .collect::<Result<Vec<_>>>()?;
    let values: DiceMap<f64> = entries.into_iter().collect();
    debug!(
        layer = layer.name(),
        keys = values.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "ev layer built"
    );
    Ok(EvMap { layer, values })
}

fn incomplete(layer: &'static str, key: &DiceKey) -> AdvisorError {
    AdvisorError::IncompleteLayer {
        layer,
        key: key.to_string(),
    }
}
