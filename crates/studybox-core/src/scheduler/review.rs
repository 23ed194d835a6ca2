//! Review processing
//!
//! One graded answer becomes one transaction:
//! 1. Snapshot risk, stability and difficulty before the review
//! 2. Update difficulty from grade and latency
//! 3. Run the stage machine with the new difficulty and session fatigue
//! 4. Plan the next review (minute steps in acquisition, safe interval after)
//! 5. Append a history entry and charge the session's fatigue
//!
//! The input card is not modified; the updated copy is returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::difficulty::next_difficulty;
use super::interval::{
    bounded_interval_days, safe_interval_days, schedule_after, schedule_after_minutes,
};
use super::risk::risk;
use super::stages::transition;
use crate::card::{Card, CardStatus, CognitiveStage, Grade, ReviewLogEntry};
use crate::config::SchedulerConfig;
use crate::session::StudySession;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Result of reviewing one card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// The card with its updated memory model
    pub card: Card,
    /// Short scheduling message for the learner
    pub message: String,
    pub stage_before: CognitiveStage,
    /// Forgetting risk right before the answer
    pub risk_before: f64,
    /// Delay until the next review, in days
    pub interval_days: f64,
}

/// Applies graded answers to cards.
#[derive(Debug, Clone, Copy)]
pub struct ReviewProcessor<'a> {
    config: &'a SchedulerConfig,
}

impl<'a> ReviewProcessor<'a> {
    pub fn new(config: &'a SchedulerConfig) -> Self {
        Self { config }
    }

    /// Review `card` with `grade` after `time_to_recall` seconds.
    pub fn review(
        &self,
        card: &Card,
        grade: Grade,
        time_to_recall: f64,
        session: &mut StudySession,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        let config = self.config;
        let time_to_recall = time_to_recall.max(0.0);
        let fatigue = session.fatigue();

        let stage_before = card.stage();
        let stability_before = card.metrics().stability();
        let difficulty_before = card.metrics().difficulty();
        let risk_before = risk(card, now, config);

        let difficulty = next_difficulty(
            difficulty_before,
            grade,
            time_to_recall,
            &card.content,
            config,
        );
        let next = transition(
            stage_before,
            stability_before,
            grade,
            difficulty,
            fatigue,
            config,
        );

        let mut updated = card.clone();
        updated.metrics.difficulty = difficulty;
        updated.metrics.stability = next.stability;
        updated.metrics.last_review = Some(now);
        updated.stage = next.stage;
        updated.repetitions += 1;

        let (interval_days, message) = if next.stage == CognitiveStage::Acquisition {
            let steps = &config.learning_steps;
            let minutes = match grade {
                Grade::Fail => steps.fail,
                Grade::Hard => steps.hard,
                _ => steps.good,
            };
            updated.status = CardStatus::Learning;
            updated.next_review = Some(schedule_after_minutes(now, minutes));
            let message = if grade == Grade::Fail {
                "Reset to learn again".to_string()
            } else {
                format!("Review again in {}", plural(minutes, "minute"))
            };
            (minutes as f64 / MINUTES_PER_DAY, message)
        } else {
            let days = bounded_interval_days(
                safe_interval_days(next.stability, config.target_risk),
                config.max_interval_days,
            );
            updated.status = CardStatus::Review;
            updated.next_review = Some(schedule_after(now, days));
            let whole_days = (days.round() as i64).max(1);
            let message = if grade == Grade::Fail {
                "Reset to learn again".to_string()
            } else {
                format!("Scheduled for {}", plural(whole_days, "day"))
            };
            (days, message)
        };
        updated.interval = interval_days;

        updated.metrics.history.push(ReviewLogEntry {
            timestamp: now,
            grade,
            time_to_recall,
            fatigue,
            stability_before,
            difficulty_before,
            calculated_risk: risk_before,
        });

        session.record_review(grade, &config.fatigue_costs);

        tracing::debug!(
            card_id = %card.id,
            grade = %grade,
            from = %stage_before,
            to = %next.stage,
            stability_before,
            stability = next.stability,
            difficulty,
            risk_before,
            fatigue = session.fatigue(),
            "Card reviewed"
        );

        ReviewOutcome {
            card: updated,
            message,
            stage_before,
            risk_before,
            interval_days,
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

// ============================================================================
// TESTS
// ============================================================================
