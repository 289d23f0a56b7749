//! Session state and intents
//!
//! One `Session` is one play-through. It owns its RNG, its timers and its
//! leaderboard store, so there is never more than one live game per value.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::problem::{Problem, ProblemId};
use super::rules::{
    BONUS_SPAWN_COUNT, max_target, points_per_solve, problems_required, spawn_period_ms,
};
use super::schedule::{Schedule, Task};
use crate::consts::*;
use crate::highscores::{Leaderboard, LeaderboardEntry};
use crate::platform::KeyValueStore;
use crate::settings::Settings;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No game started yet
    Idle,
    /// Timers running, intents accepted
    Playing,
    /// Clock frozen until resumed
    Paused,
    /// Level cleared, waiting for `start_next_level`
    LevelComplete,
    /// Run ended and was recorded
    GameOver,
}

/// A player intent, as fed in by a presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Intent {
    StartGame,
    PauseGame,
    ResumeGame,
    /// Quit; the presentation layer is expected to have confirmed it
    EndGame,
    StartNextLevel,
    ToggleSound,
    CycleDigit { id: ProblemId, index: usize },
    ResetDigit { id: ProblemId, index: usize },
    SubmitDecimal { id: ProblemId, text: String },
}

/// Read-only summary for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub level: u32,
    pub elapsed_secs: u64,
    pub problems_completed: u32,
    pub lines_left: u32,
    pub free_slots: usize,
    pub sound_enabled: bool,
    pub problems: Vec<Problem>,
}

/// A single play-through
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    pub(crate) score: u64,
    /// 1-based level
    pub(crate) level: u32,
    pub(crate) elapsed_secs: u64,
    /// Solves on the current level
    pub(crate) problems_completed: u32,
    pub(crate) phase: SessionPhase,
    /// Active problems in spawn order
    pub(crate) problems: Vec<Problem>,
    next_problem_id: ProblemId,
    /// Whether the most recently spawned problem was reverse
    last_spawn_reverse: bool,
    rng: Pcg32,
    pub(crate) schedule: Schedule,
    events: Vec<GameEvent>,
    leaderboard: Leaderboard<S>,
    settings: Settings,
}

impl<S: KeyValueStore> Session<S> {
    /// Create an idle session; settings are read from `store`
    pub fn new(seed: u64, store: S) -> Self {
        let settings = Settings::load(&store);
        Self {
            score: 0,
            level: 1,
            elapsed_secs: 0,
            problems_completed: 0,
            phase: SessionPhase::Idle,
            problems: Vec::new(),
            next_problem_id: 0,
            last_spawn_reverse: false,
            rng: Pcg32::seed_from_u64(seed),
            schedule: Schedule::default(),
            events: Vec::new(),
            leaderboard: Leaderboard::new(store),
            settings,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True from game start until game over (including pause and level breaks)
    pub fn is_playing(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Playing | SessionPhase::Paused | SessionPhase::LevelComplete
        )
    }

    pub fn is_paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn problems_completed(&self) -> u32 {
        self.problems_completed
    }

    pub fn problems_required(&self) -> u32 {
        problems_required(self.level)
    }

    /// Solves still needed on this level
    pub fn lines_left(&self) -> u32 {
        self.problems_required().saturating_sub(self.problems_completed)
    }

    /// Room left on the table
    pub fn free_slots(&self) -> usize {
        MAX_PROBLEMS.saturating_sub(self.problems.len())
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn problem(&self, id: ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// Engine clock in milliseconds (frozen while not playing)
    pub fn now_ms(&self) -> u64 {
        self.schedule.now_ms()
    }

    /// Take all notifications emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            elapsed_secs: self.elapsed_secs,
            problems_completed: self.problems_completed,
            lines_left: self.lines_left(),
            free_slots: self.free_slots(),
            sound_enabled: self.settings.sound_enabled,
            problems: self.problems.clone(),
        }
    }

    // === Intents ===

    /// Dispatch an intent to the matching method
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::StartGame => self.start_game(),
            Intent::PauseGame => self.pause_game(),
            Intent::ResumeGame => self.resume_game(),
            Intent::EndGame => self.end_game(),
            Intent::StartNextLevel => self.start_next_level(),
            Intent::ToggleSound => self.toggle_sound(),
            Intent::CycleDigit { id, index } => self.cycle_digit(id, index),
            Intent::ResetDigit { id, index } => self.reset_digit(id, index),
            Intent::SubmitDecimal { id, text } => self.submit_decimal(id, &text),
        }
    }

    /// Start (or restart) a run from level 1
    pub fn start_game(&mut self) {
        self.schedule.cancel_all();
        self.score = 0;
        self.level = 1;
        self.elapsed_secs = 0;
        self.problems_completed = 0;
        self.problems.clear();
        self.next_problem_id = 0;
        self.last_spawn_reverse = false;
        self.phase = SessionPhase::Playing;

        log::info!("Game started");
        self.schedule.start_elapsed_tick();
        self.start_level();
    }

    /// Advance to the next level after a level-complete break
    pub fn start_next_level(&mut self) {
        if self.phase != SessionPhase::LevelComplete {
            return;
        }
        self.level += 1;
        self.problems_completed = 0;
        self.phase = SessionPhase::Playing;
        self.start_level();
    }

    pub fn pause_game(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume_game(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Playing;
            log::info!("Resumed");
        }
    }

    /// Pause if playing, resume if paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            SessionPhase::Playing => self.pause_game(),
            SessionPhase::Paused => self.resume_game(),
            _ => {}
        }
    }

    /// Player quit; ends the run exactly like a table overflow
    pub fn end_game(&mut self) {
        if self.is_playing() {
            log::info!("Player quit");
            self.game_over();
        }
    }

    /// Flip the sound preference and persist it
    pub fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.settings.save(self.leaderboard.store_mut());
    }

    pub fn cycle_digit(&mut self, id: ProblemId, index: usize) {
        let Some(problem) = self.active_problem_mut(id) else {
            return;
        };
        if problem.cycle_digit(index) {
            self.check_answer(id);
        }
    }

    /// Zero one digit. Deliberately does not re-check the answer.
    pub fn reset_digit(&mut self, id: ProblemId, index: usize) {
        if let Some(problem) = self.active_problem_mut(id) {
            problem.reset_digit(index);
        }
    }

    pub fn submit_decimal(&mut self, id: ProblemId, text: &str) {
        let Some(problem) = self.active_problem_mut(id) else {
            return;
        };
        if !problem.is_reverse {
            return;
        }
        problem.set_decimal(text);
        if problem.is_correct() {
            self.check_answer(id);
        }
    }

    // === Timer callbacks (driven by `tick`) ===

    pub(crate) fn on_elapsed_tick(&mut self) {
        self.elapsed_secs += 1;
    }

    /// Spawn-check: add a problem, or end the run if the table is full
    pub(crate) fn spawn_if_needed(&mut self) {
        let required = self.problems_required() as usize;
        let spawned = self.problems_completed as usize + self.problems.len();
        if spawned >= required {
            return;
        }
        if self.problems.len() >= MAX_PROBLEMS {
            log::info!("Table full at level {}", self.level);
            self.game_over();
        } else {
            self.spawn_problem();
        }
    }

    pub(crate) fn run_task(&mut self, task: Task) {
        match task {
            Task::SpawnProblem => {
                self.spawn_problem();
            }
            Task::RemoveProblem(id) => self.remove_problem(id),
            Task::BonusSpawn { remaining } => self.bonus_spawn(remaining),
        }
    }

    // === Internals ===

    fn start_level(&mut self) {
        self.schedule.cancel_spawn_check();
        log::info!(
            "Level {}: {} to clear, targets up to {}, spawn every {}ms",
            self.level,
            self.problems_required(),
            max_target(self.level),
            spawn_period_ms(self.level)
        );

        self.spawn_problem();
        self.schedule.schedule(INITIAL_SPAWN_OFFSET_MS, Task::SpawnProblem);
        self.schedule.arm_spawn_check(spawn_period_ms(self.level));
    }

    /// Drop a new random problem onto the table
    pub(crate) fn spawn_problem(&mut self) -> Option<ProblemId> {
        if self.problems.len() >= MAX_PROBLEMS {
            log::warn!("Spawn refused: table is full");
            return None;
        }

        let target = self.rng.random_range(1..=max_target(self.level));
        // Never two reverse problems in a row
        let is_reverse = !self.last_spawn_reverse && self.rng.random_bool(REVERSE_CHANCE);

        let id = self.next_problem_id;
        self.next_problem_id += 1;
        self.last_spawn_reverse = is_reverse;

        let problem = Problem::new(id, target, is_reverse);
        log::debug!(
            "Spawned problem {} (target {}, reverse {})",
            id,
            target,
            is_reverse
        );
        self.problems.push(problem.clone());
        self.events.push(GameEvent::ProblemSpawned { problem });
        Some(id)
    }

    /// Problem that intents may act on right now
    fn active_problem_mut(&mut self, id: ProblemId) -> Option<&mut Problem> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        self.problems.iter_mut().find(|p| p.id == id && !p.solved)
    }

    fn check_answer(&mut self, id: ProblemId) {
        let Some(problem) = self.problems.iter_mut().find(|p| p.id == id) else {
            return;
        };
        if problem.solved || !problem.is_correct() || !problem.mark_solved() {
            return;
        }
        let solved = problem.clone();

        let points = points_per_solve(self.level);
        self.problems_completed += 1;
        self.score += points;
        log::debug!(
            "Solved problem {} (+{}, {}/{})",
            id,
            points,
            self.problems_completed,
            self.problems_required()
        );

        self.events.push(GameEvent::ProblemSolved {
            problem: solved,
            points,
        });
        self.events.push(GameEvent::ScoreToast {
            text: format!("+{}", points),
        });
        self.push_success_sound();
        self.schedule.schedule(REMOVAL_DELAY_MS, Task::RemoveProblem(id));
    }

    fn remove_problem(&mut self, id: ProblemId) {
        let before = self.problems.len();
        self.problems.retain(|p| p.id != id);
        if self.problems.len() == before {
            return;
        }
        self.events.push(GameEvent::ProblemRemoved { id });

        let level_done = self.problems_completed >= self.problems_required();
        if level_done {
            self.level_complete();
        } else if self.problems.is_empty() {
            self.board_cleared();
        }
    }

    fn board_cleared(&mut self) {
        self.score += BOARD_CLEAR_BONUS;
        log::debug!("Board clear bonus +{}", BOARD_CLEAR_BONUS);
        self.events.push(GameEvent::BoardCleared {
            bonus: BOARD_CLEAR_BONUS,
        });
        self.events.push(GameEvent::ScoreToast {
            text: format!("Board Clear! +{}", BOARD_CLEAR_BONUS),
        });
        self.push_success_sound();

        let count = self.rng.random_range(BONUS_SPAWN_COUNT);
        self.bonus_spawn(count);
    }

    /// One step of the staggered bonus drop; stops once the level is covered
    fn bonus_spawn(&mut self, remaining: u32) {
        let spawned = self.problems_completed + self.problems.len() as u32;
        if remaining == 0 || spawned >= self.problems_required() {
            return;
        }
        self.spawn_problem();
        if remaining > 1 {
            self.schedule.schedule(
                BONUS_SPAWN_STAGGER_MS,
                Task::BonusSpawn {
                    remaining: remaining - 1,
                },
            );
        }
    }

    fn level_complete(&mut self) {
        self.schedule.cancel_spawn_check();
        self.schedule.cancel_tasks();
        self.problems.clear();
        self.phase = SessionPhase::LevelComplete;
        log::info!(
            "Level {} complete (score {}, {} solved)",
            self.level,
            self.score,
            self.problems_completed
        );
        self.events.push(GameEvent::LevelCompleted {
            level: self.level,
            score: self.score,
            problems_completed: self.problems_completed,
        });
    }

    fn game_over(&mut self) {
        self.phase = SessionPhase::GameOver;
        self.schedule.cancel_all();
        log::info!(
            "Game over: score {}, level {}, {} solved",
            self.score,
            self.level,
            self.problems_completed
        );

        let leaderboard: Vec<LeaderboardEntry> = self.leaderboard.record_score(self.score);
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
            level: self.level,
            problems_completed: self.problems_completed,
            leaderboard,
        });
    }

    fn push_success_sound(&mut self) {
        if self.settings.sound_enabled {
            self.events.push(GameEvent::SuccessSound);
        }
    }

    /// Put a known problem on the table (tests only)
    #[cfg(test)]
    pub(crate) fn insert_problem(&mut self, target: u32, is_reverse: bool) -> ProblemId {
        let id = self.next_problem_id;
        self.next_problem_id += 1;
        self.last_spawn_reverse = is_reverse;
        self.problems.push(Problem::new(id, target, is_reverse));
        id
    }

    /// Started session with an empty table and no pending tasks (tests only)
    #[cfg(test)]
    pub(crate) fn started_empty(seed: u64, store: S) -> Self {
        let mut session = Self::new(seed, store);
        session.start_game();
        session.problems.clear();
        session.schedule.cancel_tasks();
        session.drain_events();
        session
    }
}
