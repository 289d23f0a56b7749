//! Notifications from the engine to the presentation layer
//!
//! The engine only records these; rendering, toasts and audio are side
//! effects chosen by whoever drains them.

use serde::Serialize;

use super::problem::{Problem, ProblemId};
use crate::highscores::LeaderboardEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum GameEvent {
    /// A problem dropped onto the table
    ProblemSpawned { problem: Problem },
    /// A problem was answered correctly
    ProblemSolved { problem: Problem, points: u64 },
    /// A solved problem left the table after its removal delay
    ProblemRemoved { id: ProblemId },
    /// Short score popup text, e.g. `+100`
    ScoreToast { text: String },
    /// Play the success chime (only when sound is enabled)
    SuccessSound,
    /// The table was emptied before the level was done
    BoardCleared { bonus: u64 },
    LevelCompleted {
        level: u32,
        score: u64,
        problems_completed: u32,
    },
    GameOver {
        final_score: u64,
        level: u32,
        problems_completed: u32,
        leaderboard: Vec<LeaderboardEntry>,
    },
}
