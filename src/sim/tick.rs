//! Clock driver
//!
//! Advances a session's clock and fires every timer that comes due, in
//! order. Nothing moves unless the session is `Playing`: pausing freezes the
//! elapsed counter, the spawn schedule and pending one-shot tasks alike.

use super::schedule::Due;
use super::state::{Session, SessionPhase};
use crate::platform::KeyValueStore;

/// Advance the session by `dt_ms` milliseconds of play
pub fn tick<S: KeyValueStore>(session: &mut Session<S>, dt_ms: u64) {
    if session.phase != SessionPhase::Playing {
        return;
    }

    let until = session.schedule.now_ms().saturating_add(dt_ms);
    while session.phase == SessionPhase::Playing {
        let Some(due) = session.schedule.pop_due(until) else {
            break;
        };
        match due {
            Due::ElapsedTick => session.on_elapsed_tick(),
            Due::SpawnCheck => session.spawn_if_needed(),
            Due::Task(task) => session.run_task(task),
        }
    }

    if session.phase == SessionPhase::Playing {
        session.schedule.settle(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::MemoryStore;
    use crate::sim::GameEvent;
    use crate::sim::rules::problems_required;

    fn session() -> Session<MemoryStore> {
        Session::started_empty(42, MemoryStore::new())
    }

    fn spawned(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ProblemSpawned { .. }))
            .count()
    }

    #[test]
    fn test_opening_spawns() {
        let mut s = Session::new(5, MemoryStore::new());
        s.start_game();
        assert_eq!(s.problems().len(), 1);

        tick(&mut s, INITIAL_SPAWN_OFFSET_MS - 1);
        assert_eq!(s.problems().len(), 1);
        tick(&mut s, 1);
        assert_eq!(s.problems().len(), 2);

        // First spawn check at 12.4s adds a third
        tick(&mut s, 12_400 - INITIAL_SPAWN_OFFSET_MS);
        assert_eq!(s.problems().len(), 3);
        assert_eq!(s.elapsed_secs(), 12);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut s = session();
        let id = s.insert_problem(1, false);
        s.cycle_digit(id, 2);

        s.pause_game();
        tick(&mut s, 60_000);
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.now_ms(), 0);
        // Removal waits for resume
        assert!(s.problem(id).is_some());

        s.resume_game();
        tick(&mut s, REMOVAL_DELAY_MS);
        assert!(s.problem(id).is_none());
    }

    #[test]
    fn test_paused_full_table_survives_spawn_checks() {
        let mut s = session();
        for _ in 0..MAX_PROBLEMS {
            s.spawn_problem();
        }
        s.drain_events();

        s.pause_game();
        for _ in 0..5 {
            tick(&mut s, 12_400);
        }
        assert_eq!(s.phase(), SessionPhase::Paused);
        assert_eq!(s.problems().len(), MAX_PROBLEMS);
        assert!(s.leaderboard().load_scores().is_empty());
        assert!(s.drain_events().is_empty());

        s.resume_game();
        tick(&mut s, 12_400);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.leaderboard().load_scores().len(), 1);
    }

    #[test]
    fn test_huge_step_saturates_clock() {
        let mut s = Session::new(3, MemoryStore::new());
        s.start_game();
        tick(&mut s, 10);
        tick(&mut s, u64::MAX);
        // Nobody answers, so the table fills up
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert!(s.now_ms() < u64::MAX);

        let now = s.now_ms();
        tick(&mut s, u64::MAX);
        assert_eq!(s.now_ms(), now);
    }

    #[test]
    fn test_table_full_ends_game_on_spawn_check() {
        let mut s = session();
        for _ in 0..MAX_PROBLEMS {
            s.spawn_problem();
        }
        s.drain_events();

        tick(&mut s, 12_400);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert!(s.schedule.is_idle());
        assert_eq!(s.leaderboard().load_scores().len(), 1);
        assert!(matches!(
            s.drain_events().last(),
            Some(GameEvent::GameOver { .. })
        ));

        // Clock no longer runs
        let now = s.now_ms();
        tick(&mut s, 10_000);
        assert_eq!(s.now_ms(), now);
    }

    #[test]
    fn test_last_solve_completes_level_without_bonus() {
        let mut s = session();
        let required = problems_required(1);
        s.problems_completed = required - 1;
        let id = s.insert_problem(1, false);
        s.cycle_digit(id, 2);
        assert_eq!(s.problems_completed(), required);
        s.drain_events();

        tick(&mut s, REMOVAL_DELAY_MS - 1);
        assert_eq!(s.phase(), SessionPhase::Playing);
        tick(&mut s, 1);

        assert_eq!(s.phase(), SessionPhase::LevelComplete);
        assert_eq!(s.score(), 100);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelCompleted {
            level: 1,
            score: 100,
            problems_completed: required,
        }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::BoardCleared { .. })));
        assert_eq!(spawned(&events), 0);
        assert!(s.problems().is_empty());
        assert_eq!(s.schedule.spawn_check_period_ms(), None);
    }

    #[test]
    fn test_level_completes_with_problems_left() {
        let mut s = session();
        s.problems_completed = problems_required(1) - 1;
        let id = s.insert_problem(2, false);
        s.insert_problem(3, false);
        s.cycle_digit(id, 2);
        s.cycle_digit(id, 2);

        tick(&mut s, REMOVAL_DELAY_MS);
        assert_eq!(s.phase(), SessionPhase::LevelComplete);
        assert!(s.problems().is_empty());
    }

    #[test]
    fn test_board_clear_bonus_spawns_two_to_four() {
        let mut s = session();
        let id = s.insert_problem(1, false);
        s.cycle_digit(id, 2);
        s.drain_events();

        tick(&mut s, REMOVAL_DELAY_MS);
        assert_eq!(s.score(), 100 + BOARD_CLEAR_BONUS);
        assert_eq!(s.problems().len(), 1);

        tick(&mut s, 3 * BONUS_SPAWN_STAGGER_MS);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::BoardCleared {
            bonus: BOARD_CLEAR_BONUS
        }));
        let n = spawned(&events);
        assert!((2..=4).contains(&n), "spawned {}", n);
        assert_eq!(s.problems().len(), n);
        assert_eq!(s.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_bonus_spawns_respect_required() {
        let mut s = session();
        s.problems_completed = problems_required(1) - 2;
        let id = s.insert_problem(1, false);
        s.cycle_digit(id, 2);
        s.drain_events();

        tick(&mut s, REMOVAL_DELAY_MS + 3 * BONUS_SPAWN_STAGGER_MS);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::BoardCleared {
            bonus: BOARD_CLEAR_BONUS
        }));
        // Only one more solve is needed, so only one problem drops in
        assert_eq!(spawned(&events), 1);
    }

    #[test]
    fn test_game_over_cancels_pending_removal() {
        let mut s = session();
        let id = s.insert_problem(1, false);
        s.insert_problem(50, false);
        s.cycle_digit(id, 2);
        s.end_game();
        s.drain_events();

        tick(&mut s, REMOVAL_DELAY_MS);
        assert!(s.drain_events().is_empty());
        assert!(s.problem(id).is_some());
    }

    #[test]
    fn test_next_level_restarts_schedule() {
        let mut s = session();
        s.problems_completed = problems_required(1) - 1;
        let id = s.insert_problem(1, false);
        s.cycle_digit(id, 2);
        tick(&mut s, REMOVAL_DELAY_MS);
        assert_eq!(s.phase(), SessionPhase::LevelComplete);

        // Break between levels does not count as play time
        let elapsed = s.elapsed_secs();
        tick(&mut s, 5_000);
        assert_eq!(s.elapsed_secs(), elapsed);

        s.start_next_level();
        assert_eq!(s.level(), 2);
        assert_eq!(s.problems_completed(), 0);
        assert_eq!(s.lines_left(), 20);
        assert_eq!(s.problems().len(), 1);
        assert_eq!(s.schedule.spawn_check_period_ms(), Some(10_800));
        assert!(s.problems().iter().all(|p| p.target <= 115));

        tick(&mut s, INITIAL_SPAWN_OFFSET_MS);
        assert_eq!(s.problems().len(), 2);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Session::new(99, MemoryStore::new());
        let mut b = Session::new(99, MemoryStore::new());
        a.start_game();
        b.start_game();
        for _ in 0..40 {
            tick(&mut a, 1_000);
            tick(&mut b, 1_000);
        }
        assert_eq!(a.problems(), b.problems());
        assert_eq!(a.phase(), b.phase());
    }
}
