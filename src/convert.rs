//! Decimal <-> hexadecimal conversion helpers
//!
//! Answers are always exactly `HEX_DIGITS` wide, most significant digit first.

use crate::consts::{HEX_DIGITS, MAX_TARGET};

/// Hex digit glyphs indexed by digit value
pub const HEX_CHARS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// Place value of each answer digit
pub const DIGIT_WEIGHTS: [u32; HEX_DIGITS] = [256, 16, 1];

/// Glyph for a single digit value (values above 15 wrap)
#[inline]
pub fn digit_char(value: u8) -> char {
    HEX_CHARS[(value & 0x0F) as usize]
}

/// Convert a value to three uppercase, zero-padded hex digits.
///
/// Returns `None` when the value does not fit in the answer field.
pub fn decimal_to_hex(value: u32) -> Option<String> {
    if value > MAX_TARGET {
        return None;
    }
    Some(format!("{:03X}", value))
}

/// Parse a three-digit hex string back to its value.
///
/// Accepts either case; rejects anything that is not exactly three hex digits.
pub fn hex_to_decimal(hex: &str) -> Option<u32> {
    if hex.len() != HEX_DIGITS || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Split a value into per-digit weights `[256s, 16s, 1s]`
pub fn to_digits(value: u32) -> Option<[u8; HEX_DIGITS]> {
    if value > MAX_TARGET {
        return None;
    }
    Some([
        ((value >> 8) & 0x0F) as u8,
        ((value >> 4) & 0x0F) as u8,
        (value & 0x0F) as u8,
    ])
}

/// Combine per-digit weights back into a value
pub fn from_digits(digits: &[u8; HEX_DIGITS]) -> u32 {
    digits
        .iter()
        .zip(DIGIT_WEIGHTS)
        .map(|(&d, w)| d as u32 * w)
        .sum()
}
