//! Arithmetic problem generation
//!
//! Problems scale with the player's score across three tiers: plain
//! addition/subtraction with large operands, all four operators over
//! small operands, and bracketed two-operator expressions. Division never
//! leaves the integers: the answer is chosen first and the dividend built
//! from it, or the draw is retried until it divides exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Bound on compound division redraws before falling back to multiplication
const MAX_ATTEMPTS: u32 = 32;

/// A generated arithmetic problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Display text, e.g. `"7 + 12"` or `"(3 - 1) * 4"`
    pub text: String,
    /// The one correct answer
    pub answer: i32,
}

/// Problem difficulty, keyed on score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Addition/subtraction over [1, 50]; answers may be negative
    Basic,
    /// All four operators over [2, 12], subtraction kept non-negative
    Mixed,
    /// Bracketed `(a op b) op c` over [1, 10]
    Compound,
}

/// Difficulty tier for a given score
pub fn tier_for_score(score: u64, tuning: &Tuning) -> Tier {
    if score >= tuning.tier2_score {
        Tier::Compound
    } else if score >= tuning.tier1_score {
        Tier::Mixed
    } else {
        Tier::Basic
    }
}

/// Generate a problem appropriate for the current score
pub fn generate(score: u64, tuning: &Tuning, rng: &mut impl Rng) -> Problem {
    match tier_for_score(score, tuning) {
        Tier::Basic => generate_basic(rng),
        Tier::Mixed => generate_mixed(rng),
        Tier::Compound => generate_compound(rng),
    }
}

fn generate_basic(rng: &mut impl Rng) -> Problem {
    let a: i32 = rng.random_range(1..=50);
    let b: i32 = rng.random_range(1..=50);
    if rng.random_bool(0.5) {
        Problem {
            text: format!("{} + {}", a, b),
            answer: a + b,
        }
    } else {
        // Operands stay in draw order, so early answers can go negative
        Problem {
            text: format!("{} - {}", a, b),
            answer: a - b,
        }
    }
}

fn generate_mixed(rng: &mut impl Rng) -> Problem {
    let a: i32 = rng.random_range(2..=12);
    let b: i32 = rng.random_range(2..=12);
    match rng.random_range(0..4) {
        0 => Problem {
            text: format!("{} + {}", a, b),
            answer: a + b,
        },
        1 => {
            // Reordered so the answer stays non-negative
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            Problem {
                text: format!("{} - {}", hi, lo),
                answer: hi - lo,
            }
        }
        2 => Problem {
            text: format!("{} * {}", a, b),
            answer: a * b,
        },
        _ => {
            // Answer first, dividend built from it: always exact
            Problem {
                text: format!("{} / {}", a * b, b),
                answer: a,
            }
        }
    }
}

fn generate_compound(rng: &mut impl Rng) -> Problem {
    for _ in 0..MAX_ATTEMPTS {
        let a: i32 = rng.random_range(1..=10);
        let b: i32 = rng.random_range(1..=10);
        let c: i32 = rng.random_range(1..=10);
        let (inner, op) = if rng.random_bool(0.5) {
            (a + b, '+')
        } else {
            (a - b, '-')
        };
        if rng.random_bool(0.5) {
            return Problem {
                text: format!("({} {} {}) * {}", a, op, b, c),
                answer: inner * c,
            };
        }
        if inner % c == 0 {
            return Problem {
                text: format!("({} {} {}) / {}", a, op, b, c),
                answer: inner / c,
            };
        }
        // Division didn't come out even; redraw everything
    }

    // Retries exhausted on divisions; multiplication always works
    let a: i32 = rng.random_range(1..=10);
    let b: i32 = rng.random_range(1..=10);
    let c: i32 = rng.random_range(1..=10);
    Problem {
        text: format!("({} + {}) * {}", a, b, c),
        answer: (a + b) * c,
    }
}
