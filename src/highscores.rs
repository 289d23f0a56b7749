//! High score leaderboard
//!
//! Every finished run is appended; the list is kept sorted descending by
//! score and persisted as a JSON array under a single storage key.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StoreError};

/// Storage key for the leaderboard payload
pub const STORAGE_KEY: &str = "hex_drop_scores";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Final score of the run
    pub score: u64,
    /// Local date the run ended
    pub date: String,
}

/// Leaderboard backed by a key-value store
#[derive(Debug, Clone)]
pub struct Leaderboard<S: KeyValueStore> {
    store: S,
}

/// Outcome of reading the persisted payload
enum Persisted {
    Entries(Vec<LeaderboardEntry>),
    Corrupt,
}

impl<S: KeyValueStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load all persisted scores, best first.
    ///
    /// Absent, unreadable and corrupt payloads all read as an empty list.
    pub fn load_scores(&self) -> Vec<LeaderboardEntry> {
        match self.read() {
            Ok(Persisted::Entries(entries)) => entries,
            Ok(Persisted::Corrupt) => Vec::new(),
            Err(e) => {
                log::error!("Failed to load scores: {}", e);
                Vec::new()
            }
        }
    }

    /// Record a score dated today and return the updated list
    pub fn record_score(&mut self, score: u64) -> Vec<LeaderboardEntry> {
        self.record_score_on(score, today())
    }

    /// Record a score with an explicit date and return the updated list.
    ///
    /// A corrupt payload is cleared and replaced. A failed write leaves the
    /// previously persisted payload untouched.
    pub fn record_score_on(
        &mut self,
        score: u64,
        date: impl Into<String>,
    ) -> Vec<LeaderboardEntry> {
        let entry = LeaderboardEntry {
            score,
            date: date.into(),
        };

        let mut entries = match self.read() {
            Ok(Persisted::Entries(entries)) => entries,
            Ok(Persisted::Corrupt) => {
                if let Err(e) = self.store.remove(STORAGE_KEY) {
                    log::warn!("Failed to reset corrupt leaderboard: {}", e);
                }
                Vec::new()
            }
            Err(e) => {
                // Writing now could clobber entries we failed to read
                log::error!("Failed to save score {}: {}", score, e);
                return vec![entry];
            }
        };

        entries.push(entry);
        // Stable: equal scores keep the order they were achieved in
        entries.sort_by(|a, b| b.score.cmp(&a.score));

        match self.write(&entries) {
            Ok(()) => log::info!("Score {} saved ({} entries)", score, entries.len()),
            Err(e) => log::error!("Failed to save score {}: {}", score, e),
        }
        entries
    }

    fn read(&self) -> Result<Persisted, StoreError> {
        let Some(json) = self.store.get(STORAGE_KEY)? else {
            return Ok(Persisted::Entries(Vec::new()));
        };
        match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
            Ok(entries) => Ok(Persisted::Entries(entries)),
            Err(e) => {
                log::warn!("Leaderboard payload is corrupt, treating as empty: {}", e);
                Ok(Persisted::Corrupt)
            }
        }
    }

    fn write(&mut self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries)?;
        self.store.set(STORAGE_KEY, &json)
    }
}

/// Best score in a sorted list
pub fn top_score(entries: &[LeaderboardEntry]) -> Option<u64> {
    entries.first().map(|e| e.score)
}

/// 1-based position of the first entry with this score
pub fn rank_of(entries: &[LeaderboardEntry], score: u64) -> Option<usize> {
    entries.iter().position(|e| e.score == score).map(|i| i + 1)
}

/// Today's local date, e.g. `2026-10-16`
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
