//! Browser bindings
//!
//! A JS presentation layer owns one `WebGame`, calls `tick` from its frame
//! loop, forwards intents, and renders whatever `drain_events`/`snapshot`
//! report. Payloads cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::platform::LocalStorage;
use crate::sim::{Intent, Session, tick};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Hex Drop (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorage>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = js_sys::Date::now() as u64;
        WebGame {
            session: Session::new(seed, LocalStorage),
        }
    }

    /// Advance by `dt_ms` of wall-clock time
    pub fn tick(&mut self, dt_ms: f64) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            tick(&mut self.session, dt_ms as u64);
        }
    }

    /// Apply a JSON intent, e.g. `{"kind":"CycleDigit","id":3,"index":2}`.
    /// Malformed intents are dropped like any other invalid intent.
    pub fn apply(&mut self, intent_json: &str) {
        match serde_json::from_str::<Intent>(intent_json) {
            Ok(intent) => self.session.apply(intent),
            Err(e) => log::warn!("Ignoring malformed intent: {}", e),
        }
    }

    pub fn start_game(&mut self) {
        self.session.start_game();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn end_game(&mut self) {
        self.session.end_game();
    }

    pub fn start_next_level(&mut self) {
        self.session.start_next_level();
    }

    pub fn toggle_sound(&mut self) {
        self.session.toggle_sound();
    }

    pub fn cycle_digit(&mut self, id: u32, index: usize) {
        self.session.cycle_digit(id, index);
    }

    pub fn reset_digit(&mut self, id: u32, index: usize) {
        self.session.reset_digit(id, index);
    }

    pub fn submit_decimal(&mut self, id: u32, text: &str) {
        self.session.submit_decimal(id, text);
    }

    /// Pending notifications as a JSON array
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_else(|_| "[]".into())
    }

    /// Current state as a JSON object
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|_| "{}".into())
    }

    /// Persisted leaderboard as a JSON array
    pub fn high_scores(&self) -> String {
        serde_json::to_string(&self.session.leaderboard().load_scores())
            .unwrap_or_else(|_| "[]".into())
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
