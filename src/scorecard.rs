//! Scorecard: which of the 15 categories have been scored.
//!
//! A [`Scorecard`] is a small `Copy` value used as part of state-table keys.
//! Marking a category returns a new scorecard and leaves the original as is.

use std::fmt;
use std::str::FromStr;

use crate::constants::CATEGORY_COUNT;
use crate::error::AdvisorError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scorecard([bool; CATEGORY_COUNT]);

impl Scorecard {
    /// Fresh game: nothing scored.
    pub fn empty() -> Self {
        Scorecard([false; CATEGORY_COUNT])
    }

    /// Game over: everything scored.
    pub fn full() -> Self {
        Scorecard([true; CATEGORY_COUNT])
    }

    pub fn from_marked(marked: [bool; CATEGORY_COUNT]) -> Self {
        Scorecard(marked)
    }

    /// Build from a slice of exactly 15 booleans.
    pub fn from_slice(marked: &[bool]) -> Result<Self, AdvisorError> {
        let arr: [bool; CATEGORY_COUNT] = marked.try_into().map_err(|_| {
            AdvisorError::InvalidScorecard(format!(
                "expected {} categories, got {}",
                CATEGORY_COUNT,
                marked.len()
            ))
        })?;
        Ok(Scorecard(arr))
    }

    /// Whether `category` has been scored. Out-of-range categories are never marked.
    pub fn is_marked(&self, category: usize) -> bool {
        self.0.get(category).copied().unwrap_or(false)
    }

    /// Copy of this scorecard with `category` marked.
    pub fn with_marked(&self, category: usize) -> Result<Self, AdvisorError> {
        if category >= CATEGORY_COUNT {
            return Err(AdvisorError::InvalidCategory(category));
        }
        let mut marked = self.0;
        marked[category] = true;
        Ok(Scorecard(marked))
    }

    /// Unmarked categories in ascending order.
    pub fn unmarked(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CATEGORY_COUNT).filter(move |&c| !self.0[c])
    }

    pub fn marked_count(&self) -> usize {
        self.0.iter().filter(|&&m| m).count()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|&m| m)
    }
}

/// 15 characters of '0'/'1', category 0 first.
impl fmt::Display for Scorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &m in &self.0 {
            f.write_str(if m { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Scorecard {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != CATEGORY_COUNT {
            return Err(AdvisorError::InvalidScorecard(format!(
                "{s:?} must have {CATEGORY_COUNT} characters"
            )));
        }
        let mut marked = [false; CATEGORY_COUNT];
        for (slot, ch) in marked.iter_mut().zip(s.chars()) {
            *slot = match ch {
                '0' => false,
                '1' => true,
                _ => {
                    return Err(AdvisorError::InvalidScorecard(format!(
                        "{s:?} contains {ch:?}, expected '0' or '1'"
                    )))
                }
            };
        }
        Ok(Scorecard(marked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_marked_is_copy_on_write() {
        let card = Scorecard::empty();
        let marked = card.with_marked(5).unwrap();
        assert!(!card.is_marked(5));
        assert!(marked.is_marked(5));
        assert_eq!(marked.marked_count(), 1);
        assert_ne!(card, marked);
    }

    #[test]
    fn test_with_marked_rejects_out_of_range() {
        assert!(matches!(
            Scorecard::empty().with_marked(15),
            Err(AdvisorError::InvalidCategory(15))
        ));
    }

    #[test]
    fn test_unmarked() {
        let card = Scorecard::empty()
            .with_marked(0)
            .and_then(|c| c.with_marked(14))
            .unwrap();
        let unmarked: Vec<usize> = card.unmarked().collect();
        assert_eq!(unmarked, (1..14).collect::<Vec<_>>());
        assert!(Scorecard::full().unmarked().next().is_none());
        assert!(Scorecard::full().is_full());
        assert!(!card.is_full());
    }

    #[test]
    fn test_from_slice() {
        assert!(Scorecard::from_slice(&[false; 15]).is_ok());
        assert!(Scorecard::from_slice(&[false; 14]).is_err());
        assert!(Scorecard::from_slice(&[true; 16]).is_err());
    }

    #[test]
    fn test_string_round_trip() {
        let card: Scorecard = "000111000111000".parse().unwrap();
        assert!(card.is_marked(3));
        assert!(!card.is_marked(0));
        assert_eq!(card.marked_count(), 6);
        assert_eq!(card.to_string(), "000111000111000");
        assert_eq!(Scorecard::empty().to_string(), "000000000000000");
    }

    #[test]
    fn test_parse_errors() {
        assert!("0001".parse::<Scorecard>().is_err());
        assert!("00011100011100x".parse::<Scorecard>().is_err());
    }
}
