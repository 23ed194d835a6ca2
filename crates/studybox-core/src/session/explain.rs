//! Human-readable explanations for session entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::config::SchedulerConfig;

/// Visual category the UI uses to colour a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualCue {
    Critical,
    Warning,
    Safe,
    New,
}

impl VisualCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualCue::Critical => "critical",
            VisualCue::Warning => "warning",
            VisualCue::Safe => "safe",
            VisualCue::New => "new",
        }
    }
}

impl std::fmt::Display for VisualCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a card is in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub message: String,
    #[serde(rename = "visualCue")]
    pub cue: VisualCue,
}

impl Explanation {
    fn new(cue: VisualCue, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cue,
        }
    }
}

/// Explain a card's position from its stage, overdue-ness and risk.
pub fn explain(card: &Card, risk: f64, now: DateTime<Utc>, config: &SchedulerConfig) -> Explanation {
    let pct = (risk * 100.0).round() as i64;

    if card.is_new() {
        return if card.repetitions() == 0 {
            Explanation::new(VisualCue::New, "New card: first time seeing this")
        } else {
            Explanation::new(VisualCue::New, "Still learning: keep practicing")
        };
    }

    if card.is_overdue(now) {
        let days = card.days_overdue(now);
        let late = if days < 1.0 {
            "Due now".to_string()
        } else {
            let whole = days.floor() as i64;
            format!("Overdue by {} day{}", whole, if whole == 1 { "" } else { "s" })
        };
        return if risk > config.critical_risk {
            Explanation::new(VisualCue::Critical, format!("{late}, {pct}% chance forgotten"))
        } else {
            Explanation::new(VisualCue::Warning, late)
        };
    }

    if risk > config.critical_risk {
        Explanation::new(VisualCue::Critical, format!("High risk: {pct}% chance forgotten"))
    } else if risk > config.target_risk {
        Explanation::new(VisualCue::Warning, format!("Fading: {pct}% chance forgotten"))
    } else {
        Explanation::new(VisualCue::Safe, format!("Memory is fresh ({pct}% risk)"))
    }
}
