//! Hex Drop - a timed hexadecimal conversion arcade game
//!
//! Core modules:
//! - `sim`: Deterministic session engine (spawning, answer checking, scoring, levels)
//! - `convert`: Decimal <-> fixed-width hexadecimal helpers
//! - `highscores`: Persisted leaderboard
//! - `platform`: Key-value storage backends (memory, file, LocalStorage)
//! - `settings`: Player preferences

pub mod convert;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{Leaderboard, LeaderboardEntry};
pub use platform::{KeyValueStore, MemoryStore, StoreError};
pub use settings::Settings;
pub use sim::{GameEvent, Intent, Problem, Session, SessionPhase, tick};

/// Game configuration constants
pub mod consts {
    /// Maximum problems on the table at once; a spawn check at capacity ends the run
    pub const MAX_PROBLEMS: usize = 7;

    /// Number of hex digits in the answer field (weights 256, 16, 1)
    pub const HEX_DIGITS: usize = 3;
    /// Largest value a three-digit answer field can hold
    pub const MAX_TARGET: u32 = 0xFFF;

    /// Points per solve on level 1
    pub const POINTS_LEVEL_ONE: u64 = 100;
    /// Points per solve from level 2 on
    pub const POINTS_LATER_LEVELS: u64 = 125;
    /// Bonus for emptying the table before the level is done
    pub const BOARD_CLEAR_BONUS: u64 = 250;

    /// Chance that a spawned problem is a reverse (hex -> decimal) puzzle
    pub const REVERSE_CHANCE: f64 = 0.25;

    /// Elapsed-time counter period
    pub const ELAPSED_TICK_MS: u64 = 1000;
    /// Delay before the second opening problem of a level arrives
    pub const INITIAL_SPAWN_OFFSET_MS: u64 = 800;
    /// Delay between solving a problem and removing it from the table
    pub const REMOVAL_DELAY_MS: u64 = 800;
    /// Stagger between board-clear bonus spawns
    pub const BONUS_SPAWN_STAGGER_MS: u64 = 300;

    /// Fixed driver timestep used by the native demo (20 Hz)
    pub const SIM_DT_MS: u64 = 50;
}
