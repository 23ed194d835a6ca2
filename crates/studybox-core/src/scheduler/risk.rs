//! Forgetting risk
//!
//! Two decay regimes:
//! - Never-consolidated cards (acquisition, stability 0) forget on the minute
//!   scale: `risk = 1 - 0.5^(minutes / half_life)`.
//! - Everything else follows the day-scale curve anchored so that one unit of
//!   effective stability leaves exactly 90% retrievability:
//!   `risk = 1 - 0.9^(days / (stability / complexity))`.

use chrono::{DateTime, Utc};

use crate::card::{Card, CognitiveStage};
use crate::config::SchedulerConfig;

/// Retrievability left after one unit of stability
pub const RETENTION_AT_STABILITY: f64 = 0.9;

/// Below this many minutes a never-consolidated card carries no risk
pub const SHORT_TERM_GRACE_MINUTES: f64 = 1.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Risk on the short-term (minutes) curve.
pub fn short_term_risk(minutes_elapsed: f64, half_life_minutes: f64) -> f64 {
    if minutes_elapsed < SHORT_TERM_GRACE_MINUTES {
        return 0.0;
    }
    (1.0 - 0.5_f64.powf(minutes_elapsed / half_life_minutes)).clamp(0.0, 1.0)
}

/// Risk on the long-term (days) curve.
pub fn long_term_risk(days_elapsed: f64, stability: f64, complexity: f64) -> f64 {
    let days_elapsed = days_elapsed.max(0.0);
    let effective = stability / complexity.max(1.0);
    if effective <= 0.0 {
        return if days_elapsed > 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - RETENTION_AT_STABILITY.powf(days_elapsed / effective)).clamp(0.0, 1.0)
}

/// Probability the card has been forgotten at `now`, in [0, 1].
pub fn risk(card: &Card, now: DateTime<Utc>, config: &SchedulerConfig) -> f64 {
    let elapsed_seconds = (now - card.reference_time()).num_milliseconds() as f64 / 1000.0;
    let elapsed_seconds = elapsed_seconds.max(0.0);
    let metrics = card.metrics();

    if card.stage() == CognitiveStage::Acquisition && metrics.stability() <= 0.0 {
        short_term_risk(elapsed_seconds / 60.0, config.short_term_half_life_minutes)
    } else {
        long_term_risk(
            elapsed_seconds / SECONDS_PER_DAY,
            metrics.stability(),
            metrics.complexity(),
        )
    }
}

/// Retrievability (1 - risk).
#[inline]
pub fn retrievability(card: &Card, now: DateTime<Utc>, config: &SchedulerConfig) -> f64 {
    1.0 - risk(card, now, config)
}
