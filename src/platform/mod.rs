//! Platform abstraction layer
//!
//! Durable key-value storage for the leaderboard and settings:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one JSON file per key (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)

pub mod storage;

pub use storage::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use thiserror::Error;

/// Storage failures. Never surfaced past the leaderboard/settings layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No backing storage on this platform/session
    #[error("storage unavailable")]
    Unavailable,

    /// Backend refused the operation (quota, read-only, browser policy)
    #[error("storage rejected write: {0}")]
    Rejected(String),
}
