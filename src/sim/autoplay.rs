//! Demo player
//!
//! Produces the intents a perfect player would send to solve the oldest
//! unsolved problem. Used by the headless demo binary.

use super::problem::Problem;
use super::state::Intent;
use crate::consts::HEX_DIGITS;
use crate::convert::to_digits;

/// Intents that solve `problem`, or nothing if it is already solved
pub fn solve_intents(problem: &Problem) -> Vec<Intent> {
    if problem.solved {
        return Vec::new();
    }

    if problem.is_reverse {
        return vec![Intent::SubmitDecimal {
            id: problem.id,
            text: problem.target.to_string(),
        }];
    }

    let Some(wanted) = to_digits(problem.target) else {
        return Vec::new();
    };
    let mut intents = Vec::new();
    for index in 0..HEX_DIGITS {
        let have = problem.user_hex[index];
        let presses = (wanted[index] + 16 - have) % 16;
        for _ in 0..presses {
            intents.push(Intent::CycleDigit {
                id: problem.id,
                index,
            });
        }
    }
    intents
}

/// Intents for the oldest unsolved problem on the table
pub fn next_move(problems: &[Problem]) -> Vec<Intent> {
    problems
        .iter()
        .find(|p| !p.solved)
        .map(solve_intents)
        .unwrap_or_default()
}
