//! Safe-interval planning
//!
//! Inverts the long-term risk curve: the delay after which risk reaches the
//! target is `stability * ln(1 - target) / ln(0.9)`. At the default target of
//! 0.10 the multiplier is exactly 1, so the interval equals the stability.

use chrono::{DateTime, TimeDelta, Utc};

use super::risk::RETENTION_AT_STABILITY;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Multiplier turning stability into the safe delay for `target_risk`.
#[inline]
pub fn interval_multiplier(target_risk: f64) -> f64 {
    (1.0 - target_risk).ln() / RETENTION_AT_STABILITY.ln()
}

/// Days until risk is projected to reach `target_risk`.
pub fn safe_interval_days(stability: f64, target_risk: f64) -> f64 {
    stability.max(0.0) * interval_multiplier(target_risk)
}

/// Clamp a planned delay into `[0, max_days]`. NaN plans nothing.
#[inline]
pub fn bounded_interval_days(days: f64, max_days: f64) -> f64 {
    if days.is_nan() {
        return 0.0;
    }
    days.clamp(0.0, max_days.max(0.0))
}

/// `now` plus `days`, saturating at the end of representable time.
pub fn schedule_after(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let seconds = (days.max(0.0) * SECONDS_PER_DAY).round();
    let delta = if seconds < i64::MAX as f64 {
        TimeDelta::try_seconds(seconds as i64)
    } else {
        None
    };
    delta
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `now` plus a learning step in minutes, saturating like [`schedule_after`].
pub fn schedule_after_minutes(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    TimeDelta::try_minutes(minutes.max(0))
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Format a delay in days for display ("now", "5d", "2w", "3mo", "1y").
pub fn format_interval(days: f64) -> String {
    let days = days.max(0.0);
    if days < 1.0 / 24.0 {
        let minutes = (days * 1440.0).round() as i64;
        if minutes <= 0 {
            "now".to_string()
        } else {
            format!("{}m", minutes)
        }
    } else if days < 1.0 {
        format!("{}h", (days * 24.0).round() as i64)
    } else if days < 7.0 {
        format!("{}d", days.round() as i64)
    } else if days < 30.0 {
        format!("{}w", (days / 7.0).floor() as i64)
    } else if days < 365.0 {
        format!("{}mo", (days / 30.0).floor() as i64)
    } else {
        format!("{}y", (days / 365.0).floor() as i64)
    }
}
