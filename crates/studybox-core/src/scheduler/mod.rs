//! Adaptive Scheduling Module
//!
//! The memory model behind every card:
//!
//! - [`risk`]: continuous-time forgetting probability
//! - [`difficulty`]: perceived-difficulty update from grade and latency
//! - [`stages`]: the five-state cognitive stage machine and stability update
//! - [`interval`]: safe re-review delay for a target risk
//! - [`review`]: one review transaction combining all of the above
//!
//! ## Core Formulas
//! - Short-term risk: `1 - 0.5^(minutes / 20)`
//! - Long-term risk: `1 - 0.9^(days / (stability / complexity))`
//! - Safe interval: `stability * ln(1 - target) / ln(0.9)`

pub mod difficulty;
pub mod interval;
pub mod review;
pub mod risk;
pub mod stages;

pub use difficulty::{base_delta, next_difficulty, DIFFICULTY_DRIFT, LATENCY_PENALTY};
pub use interval::{
    bounded_interval_days, format_interval, interval_multiplier, safe_interval_days,
    schedule_after, schedule_after_minutes,
};
pub use review::{ReviewOutcome, ReviewProcessor};
pub use risk::{long_term_risk, retrievability, risk, short_term_risk, RETENTION_AT_STABILITY};
pub use stages::{grade_bonus, stage_for_stability, transition, StageTransition};
