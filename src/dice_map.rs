//! Map from dice multisets to values, keyed by [`DiceKey`].

use std::collections::HashMap;

use crate::dice_key::DiceKey;

/// Values stored per dice multiset. Lookups ignore the order of the dice.
#[derive(Clone, Debug)]
pub struct DiceMap<V> {
    map: HashMap<DiceKey, V>,
}

impl<V> Default for DiceMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> DiceMap<V> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, dice: &[u8], value: V) -> Option<V> {
        self.map.insert(DiceKey::from_dice(dice), value)
    }

    pub fn insert_key(&mut self, key: DiceKey, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// `None` also when `dice` holds a face outside 1..=6.
    pub fn get(&self, dice: &[u8]) -> Option<&V> {
        self.map.get(&DiceKey::try_from_dice(dice)?)
    }

    #[inline]
    pub fn get_key(&self, key: &DiceKey) -> Option<&V> {
        self.map.get(key)
    }

    pub fn contains(&self, dice: &[u8]) -> bool {
        DiceKey::try_from_dice(dice).is_some_and(|key| self.map.contains_key(&key))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DiceKey, &V)> {
        self.map.iter()
    }
}

impl<V> FromIterator<(DiceKey, V)> for DiceMap<V> {
    fn from_iter<I: IntoIterator<Item = (DiceKey, V)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_order() {
        let mut map = DiceMap::new();
        map.insert(&[1, 2, 3, 4, 5], 12.5);
        assert_eq!(map.get(&[5, 4, 3, 2, 1]), Some(&12.5));
        assert!(map.contains(&[2, 1, 3, 5, 4]));
        assert!(!map.contains(&[1, 2, 3, 4, 6]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_out_of_range_faces_are_absent() {
        let mut map = DiceMap::new();
        map.insert(&[1, 2], 3);
        assert_eq!(map.get(&[0, 2]), None);
        assert!(!map.contains(&[0]));
        assert!(!map.contains(&[1, 9]));
    }

    #[test]
    fn test_same_dice_overwrite() {
        let mut map = DiceMap::new();
        assert!(map.insert(&[1, 1, 2], "a").is_none());
        assert_eq!(map.insert(&[2, 1, 1], "b"), Some("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&[1, 2, 1]), Some(&"b"));
    }

    #[test]
    fn test_empty_dice_is_a_key() {
        let mut map = DiceMap::new();
        map.insert(&[], 7u32);
        assert_eq!(map.get_key(&DiceKey::EMPTY), Some(&7));
    }

    #[test]
    fn test_collect() {
        let map: DiceMap<usize> = [[1u8, 2], [3, 4]]
            .iter()
            .map(|d| (DiceKey::from_dice(d), d.len()))
            .collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&[4, 3]), Some(&2));
    }
}
