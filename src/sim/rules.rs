//! Level formulas
//!
//! Everything that scales with the level number lives here.

use std::ops::RangeInclusive;

use crate::consts::{MAX_TARGET, POINTS_LATER_LEVELS, POINTS_LEVEL_ONE};

/// Number of solves needed to clear a level
pub fn problems_required(level: u32) -> u32 {
    15 + level.saturating_sub(1) * 5
}

/// Seconds between spawn checks; speeds up with level, floored at 6s
pub fn spawn_period_secs(level: u32) -> f64 {
    ((6.2 - level.saturating_sub(1) as f64 * 0.8) * 2.0).max(6.0)
}

/// Spawn check period in whole milliseconds
pub fn spawn_period_ms(level: u32) -> u64 {
    (spawn_period_secs(level) * 1000.0).round() as u64
}

/// Largest target value spawned on a level (capped to the answer field)
pub fn max_target(level: u32) -> u32 {
    15u32.saturating_add(level.saturating_mul(50)).min(MAX_TARGET)
}

/// Points awarded per solve
pub fn points_per_solve(level: u32) -> u64 {
    if level >= 2 {
        POINTS_LATER_LEVELS
    } else {
        POINTS_LEVEL_ONE
    }
}

/// How many extra problems a board clear drops in
pub const BONUS_SPAWN_COUNT: RangeInclusive<u32> = 2..=4;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_levels() {
        assert_eq!(problems_required(1), 15);
        assert_eq!(problems_required(2), 20);
        assert_eq!(spawn_period_ms(1), 12_400);
        assert_eq!(spawn_period_ms(2), 10_800);
        assert_eq!(spawn_period_ms(4), 7_600);
        assert_eq!(spawn_period_ms(5), 6_000);
        assert_eq!(spawn_period_ms(20), 6_000);
        assert_eq!(max_target(1), 65);
        assert_eq!(max_target(2), 115);
        assert_eq!(max_target(500), 4095);
        assert_eq!(points_per_solve(1), 100);
        assert_eq!(points_per_solve(2), 125);
        assert_eq!(points_per_solve(9), 125);
    }

    proptest! {
        #[test]
        fn prop_formulas(level in 1u32..10_000) {
            prop_assert_eq!(problems_required(level), 15 + (level - 1) * 5);
            let expected = ((6.2 - (level - 1) as f64 * 0.8) * 2.0).max(6.0);
            prop_assert!((spawn_period_secs(level) - expected).abs() < 1e-9);
            prop_assert!(spawn_period_ms(level) >= 6_000);
            prop_assert!(max_target(level) <= MAX_TARGET);
            prop_assert!(max_target(level) >= 1);
        }
    }
}
