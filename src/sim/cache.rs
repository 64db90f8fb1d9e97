//! Cache generation
//!
//! Whether a cell holds a cache, and its value, are rolled from the cell's
//! indices alone. Nothing here keeps state.

use super::cell::CellId;
use super::luck::Luck;

/// Values a freshly generated cache may hold
pub const CACHE_VALUES: [u32; 4] = [1, 2, 4, 8];

const SPAWN_PURPOSE: &str = "spawn";
const VALUE_PURPOSE: &str = "value";

/// Deterministic cache generator
#[derive(Debug, Clone)]
pub struct CacheGenerator {
    luck: Luck,
    spawn_probability: f64,
}

impl CacheGenerator {
    pub fn new(luck: Luck, spawn_probability: f64) -> Self {
        Self {
            luck,
            spawn_probability,
        }
    }

    /// Does a cache spawn at this cell?
    pub fn spawns(&self, cell: CellId) -> bool {
        self.luck.roll(cell, SPAWN_PURPOSE) < self.spawn_probability
    }

    /// Generated value at a cell: 0 when nothing spawns, else one of `CACHE_VALUES`
    pub fn value_at(&self, cell: CellId) -> u32 {
        if !self.spawns(cell) {
            return 0;
        }
        value_for_roll(self.luck.roll(cell, VALUE_PURPOSE))
    }
}

/// Quartile mapping of a [0,1) roll onto cache values
pub fn value_for_roll(roll: f64) -> u32 {
    if roll < 0.25 {
        1
    } else if roll < 0.5 {
        2
    } else if roll < 0.75 {
        4
    } else {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CACHE_SPAWN_PROBABILITY, LUCK_SEED};
    use proptest::prelude::*;

    fn generator() -> CacheGenerator {
        CacheGenerator::new(Luck::new(LUCK_SEED), CACHE_SPAWN_PROBABILITY)
    }

    #[test]
    fn test_value_for_roll_boundaries() {
        assert_eq!(value_for_roll(0.0), 1);
        assert_eq!(value_for_roll(0.2499), 1);
        assert_eq!(value_for_roll(0.25), 2);
        assert_eq!(value_for_roll(0.5), 4);
        assert_eq!(value_for_roll(0.75), 8);
        assert_eq!(value_for_roll(0.9999), 8);
    }

    #[test]
    fn test_spawn_probability_extremes() {
        let never = CacheGenerator::new(Luck::new("x"), 0.0);
        let always = CacheGenerator::new(Luck::new("x"), 1.0);
        for k in 0..100 {
            let cell = CellId::new(k, -k);
            assert_eq!(never.value_at(cell), 0);
            assert!(CACHE_VALUES.contains(&always.value_at(cell)));
        }
    }

    #[test]
    fn test_spawn_rate_is_roughly_configured() {
        let generator = generator();
        let n = 5000;
        let spawned = (0..n)
            .filter(|k| generator.spawns(CellId::new(k / 100, k % 100)))
            .count();
        let rate = spawned as f64 / f64::from(n);
        assert!((rate - CACHE_SPAWN_PROBABILITY).abs() < 0.05, "rate {rate}");
    }

    proptest! {
        #[test]
        fn value_matches_spawn_decision(i in any::<i32>(), j in any::<i32>()) {
            let generator = generator();
            let cell = CellId::new(i, j);
            let value = generator.value_at(cell);
            prop_assert!(value == 0 || CACHE_VALUES.contains(&value));
            prop_assert_eq!(value == 0, !generator.spawns(cell));
            prop_assert_eq!(value, generator.value_at(cell));
        }
    }
}
