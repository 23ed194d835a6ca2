//! Perceived-difficulty update
//!
//! `new = clamp(current + base(grade) + latency_penalty + drift, 0.1, 1.0)`
//!
//! | Grade | Base delta |
//! |-------|-----------:|
//! | Fail  | +0.20      |
//! | Hard  | +0.10      |
//! | Good  | -0.05      |
//! | Easy  | -0.15      |
//!
//! A correct answer that took longer than the slow-recall limit adds +0.15,
//! and a hesitant "easy" also forfeits its -0.15. Audio cards are exempt from
//! the latency rule. Every review drifts difficulty up by +0.01.

use crate::card::{CardContent, Grade, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::config::SchedulerConfig;

/// Penalty for a slow but correct answer
pub const LATENCY_PENALTY: f64 = 0.15;

/// Upward drift applied on every review
pub const DIFFICULTY_DRIFT: f64 = 0.01;

/// Base difficulty change for a grade.
#[inline]
pub fn base_delta(grade: Grade) -> f64 {
    match grade {
        Grade::Fail => 0.20,
        Grade::Hard => 0.10,
        Grade::Good => -0.05,
        Grade::Easy => -0.15,
    }
}

/// Revised difficulty after one review.
pub fn next_difficulty(
    current: f64,
    grade: Grade,
    time_to_recall: f64,
    content: &CardContent,
    config: &SchedulerConfig,
) -> f64 {
    let mut delta = base_delta(grade);
    let mut penalty = 0.0;

    let hesitant = !content.is_audio()
        && grade >= Grade::Good
        && time_to_recall > config.slow_recall_seconds;

    if hesitant {
        penalty = LATENCY_PENALTY;
        if grade == Grade::Easy {
            delta = 0.0;
        }
    }

    (current + delta + penalty + DIFFICULTY_DRIFT).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}
