//! A single puzzle on the table
//!
//! Lifecycle: spawned -> in progress (digit/decimal edits) -> solved -> removed.
//! Removal is owned by the session; this type only tracks answer state.

use serde::Serialize;

use crate::consts::HEX_DIGITS;
use crate::convert::{decimal_to_hex, digit_char, from_digits};

/// Problem identifier, unique for the lifetime of a session
pub type ProblemId = u32;

/// One puzzle instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub id: ProblemId,
    /// Value the player must match
    pub target: u32,
    /// Hex shown, decimal expected (otherwise decimal shown, hex expected)
    pub is_reverse: bool,
    /// Player's hex digits, most significant first
    pub user_hex: [u8; HEX_DIGITS],
    /// Player's decimal text (digits only)
    pub user_decimal: String,
    /// Set exactly once
    pub solved: bool,
}

impl Problem {
    pub fn new(id: ProblemId, target: u32, is_reverse: bool) -> Self {
        Self {
            id,
            target,
            is_reverse,
            user_hex: [0; HEX_DIGITS],
            user_decimal: String::new(),
            solved: false,
        }
    }

    /// Value currently entered in the hex digits
    pub fn user_hex_value(&self) -> u32 {
        from_digits(&self.user_hex)
    }

    /// Whether the current input matches the target
    pub fn is_correct(&self) -> bool {
        if self.is_reverse {
            // Overlong input fails to parse and simply isn't correct
            !self.user_decimal.is_empty()
                && self.user_decimal.parse::<u64>().ok() == Some(self.target as u64)
        } else {
            self.user_hex_value() == self.target
        }
    }

    /// Advance one digit 0 -> 1 -> ... -> F -> 0. False if `index` is out of range.
    pub fn cycle_digit(&mut self, index: usize) -> bool {
        match self.user_hex.get_mut(index) {
            Some(d) => {
                *d = (*d + 1) % 16;
                true
            }
            None => false,
        }
    }

    /// Set one digit back to 0. False if `index` is out of range.
    pub fn reset_digit(&mut self, index: usize) -> bool {
        match self.user_hex.get_mut(index) {
            Some(d) => {
                *d = 0;
                true
            }
            None => false,
        }
    }

    /// Store decimal input with everything but ASCII digits stripped
    pub fn set_decimal(&mut self, raw: &str) -> &str {
        self.user_decimal = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        &self.user_decimal
    }

    /// Mark solved; returns false if it already was
    pub fn mark_solved(&mut self) -> bool {
        if self.solved {
            return false;
        }
        self.solved = true;
        true
    }

    /// The target as three hex digits (what a reverse problem shows)
    pub fn display_hex(&self) -> String {
        decimal_to_hex(self.target).unwrap_or_else(|| format!("{:X}", self.target))
    }

    /// The player's hex digits as text
    pub fn user_hex_string(&self) -> String {
        self.user_hex.iter().map(|&d| digit_char(d)).collect()
    }
}
