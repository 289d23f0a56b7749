//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must stay headless:
//! - Seeded RNG only
//! - Time advances only through `tick`
//! - No rendering, audio or platform dependencies beyond the injected store

pub mod autoplay;
pub mod event;
pub mod problem;
pub mod rules;
pub mod schedule;
pub mod state;
pub mod tick;

pub use event::GameEvent;
pub use problem::{Problem, ProblemId};
pub use rules::{
    max_target, points_per_solve, problems_required, spawn_period_ms, spawn_period_secs,
};
pub use state::{Intent, Session, SessionPhase, Snapshot};
pub use tick::tick;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_no_two_reverse_in_a_row(seed in any::<u64>()) {
            let mut s = Session::new(seed, MemoryStore::new());
            s.start_game();
            for _ in 0..200 {
                s.problems.clear();
                s.spawn_problem();
            }

            let reverse: Vec<bool> = s
                .drain_events()
                .into_iter()
                .filter_map(|e| match e {
                    GameEvent::ProblemSpawned { problem } => Some(problem.is_reverse),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(reverse.len(), 201);
            prop_assert!(reverse.windows(2).all(|w| !(w[0] && w[1])));
        }

        #[test]
        fn prop_targets_in_range(seed in any::<u64>(), level in 1u32..200) {
            let mut s = Session::new(seed, MemoryStore::new());
            s.start_game();
            s.level = level;
            for _ in 0..20 {
                s.problems.clear();
                s.spawn_problem();
                let p = s.problems().last().unwrap();
                prop_assert!(p.target >= 1 && p.target <= max_target(level));
            }
        }
    }
}
