//! Session-owned timers
//!
//! Two recurring timers (elapsed-time tick, spawn check) and a queue of
//! one-shot tasks, all on a millisecond clock that only the session advances.
//! Cancelling is dropping: clearing an interval or the queue is all it takes.

use super::problem::ProblemId;
use crate::consts::ELAPSED_TICK_MS;

/// Deferred one-shot work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Drop in a problem (second opening problem of a level)
    SpawnProblem,
    /// Take a solved problem off the table
    RemoveProblem(ProblemId),
    /// Next board-clear bonus spawn; `remaining` includes this one
    BonusSpawn { remaining: u32 },
}

/// Something that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    ElapsedTick,
    SpawnCheck,
    Task(Task),
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    /// Following occurrence; `None` once the clock can't reach it
    fn next(self) -> Option<Self> {
        let next_due_ms = self.next_due_ms.checked_add(self.period_ms)?;
        Some(Self { next_due_ms, ..self })
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: u64,
    seq: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now_ms: u64,
    elapsed_tick: Option<Interval>,
    spawn_check: Option<Interval>,
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Schedule {
    /// Current clock reading
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn start_elapsed_tick(&mut self) {
        self.elapsed_tick = Some(Interval {
            period_ms: ELAPSED_TICK_MS,
            next_due_ms: self.now_ms.saturating_add(ELAPSED_TICK_MS),
        });
    }

    /// (Re)arm the spawn check; the first check fires one period from now
    pub fn arm_spawn_check(&mut self, period_ms: u64) {
        let period_ms = period_ms.max(1);
        self.spawn_check = Some(Interval {
            period_ms,
            next_due_ms: self.now_ms.saturating_add(period_ms),
        });
    }

    pub fn cancel_spawn_check(&mut self) {
        self.spawn_check = None;
    }

    pub fn spawn_check_period_ms(&self) -> Option<u64> {
        self.spawn_check.map(|i| i.period_ms)
    }

    pub fn has_elapsed_tick(&self) -> bool {
        self.elapsed_tick.is_some()
    }

    /// Run `task` once, `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, task: Task) {
        self.pending.push(Pending {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Drop every pending one-shot task
    pub fn cancel_tasks(&mut self) {
        self.pending.clear();
    }

    /// Stop everything
    pub fn cancel_all(&mut self) {
        self.elapsed_tick = None;
        self.spawn_check = None;
        self.pending.clear();
    }

    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.elapsed_tick.is_none() && self.spawn_check.is_none() && self.pending.is_empty()
    }

    /// Pop the earliest item due at or before `until_ms`, moving the clock to it.
    ///
    /// Ties go elapsed tick, then spawn check, then tasks in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Due> {
        let mut best: Option<(u64, Due)> = None;
        let mut consider = |due_ms: u64, due: Due| {
            if due_ms <= until_ms && best.is_none_or(|(b, _)| due_ms < b) {
                best = Some((due_ms, due));
            }
        };

        if let Some(i) = self.elapsed_tick {
            consider(i.next_due_ms, Due::ElapsedTick);
        }
        if let Some(i) = self.spawn_check {
            consider(i.next_due_ms, Due::SpawnCheck);
        }
        let task_idx = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(idx, p)| (idx, p.due_ms, p.task));
        if let Some((_, due_ms, task)) = task_idx {
            consider(due_ms, Due::Task(task));
        }

        let (due_ms, due) = best?;
        self.now_ms = self.now_ms.max(due_ms);
        match due {
            Due::ElapsedTick => self.elapsed_tick = self.elapsed_tick.and_then(Interval::next),
            Due::SpawnCheck => self.spawn_check = self.spawn_check.and_then(Interval::next),
            Due::Task(_) => {
                if let Some((idx, _, _)) = task_idx {
                    self.pending.remove(idx);
                }
            }
        }
        Some(due)
    }

    /// Move the clock forward to `until_ms` once nothing else is due
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(schedule: &mut Schedule, until_ms: u64) -> Vec<(u64, Due)> {
        let mut fired = Vec::new();
        while let Some(due) = schedule.pop_due(until_ms) {
            fired.push((schedule.now_ms(), due));
        }
        schedule.settle(until_ms);
        fired
    }

    #[test]
    fn test_fires_in_time_order() {
        let mut s = Schedule::default();
        s.start_elapsed_tick();
        s.arm_spawn_check(2500);
        s.schedule(800, Task::SpawnProblem);
        s.schedule(800, Task::RemoveProblem(4));

        let fired = drain(&mut s, 3000);
        assert_eq!(
            fired,
            vec![
                (800, Due::Task(Task::SpawnProblem)),
                (800, Due::Task(Task::RemoveProblem(4))),
                (1000, Due::ElapsedTick),
                (2000, Due::ElapsedTick),
                (2500, Due::SpawnCheck),
                (3000, Due::ElapsedTick),
            ]
        );
        assert_eq!(s.now_ms(), 3000);
        assert_eq!(s.pending_tasks(), 0);
    }

    #[test]
    fn test_nothing_due_early() {
        let mut s = Schedule::default();
        s.schedule(300, Task::BonusSpawn { remaining: 2 });
        assert_eq!(s.pop_due(299), None);
        assert_eq!(s.pop_due(300), Some(Due::Task(Task::BonusSpawn { remaining: 2 })));
    }

    #[test]
    fn test_clock_saturates_at_max() {
        let mut s = Schedule::default();
        s.settle(u64::MAX - 500);
        s.start_elapsed_tick();
        s.arm_spawn_check(6000);
        s.schedule(800, Task::SpawnProblem);

        let fired = drain(&mut s, u64::MAX);
        assert_eq!(
            fired,
            vec![
                (u64::MAX, Due::ElapsedTick),
                (u64::MAX, Due::SpawnCheck),
                (u64::MAX, Due::Task(Task::SpawnProblem)),
            ]
        );
        // Intervals past the end of the clock are dropped, not re-fired
        assert!(s.is_idle());
    }

    #[test]
    fn test_cancel() {
        let mut s = Schedule::default();
        s.start_elapsed_tick();
        s.arm_spawn_check(6000);
        s.schedule(10, Task::SpawnProblem);

        s.cancel_tasks();
        assert_eq!(s.pending_tasks(), 0);
        s.cancel_spawn_check();
        assert_eq!(s.spawn_check_period_ms(), None);
        assert!(s.has_elapsed_tick());

        s.cancel_all();
        assert!(s.is_idle());
        assert!(drain(&mut s, 100_000).is_empty());
    }
}
