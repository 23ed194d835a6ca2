//! Per-session context
//!
//! Fatigue accumulates while a learner works through a session and dampens
//! stability recovery after failures. It belongs to exactly one session: it is
//! never persisted and starts at zero whenever a new [`StudySession`] is made.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::card::Grade;
use crate::config::FatigueCosts;

/// Mutable state of one active study session.
#[derive(Debug, Clone, PartialEq)]
pub struct StudySession {
    id: Uuid,
    started_at: DateTime<Utc>,
    fatigue: f64,
    reviews: u32,
}

impl StudySession {
    /// Start a fresh session with zero fatigue.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            fatigue: 0.0,
            reviews: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current fatigue in [0, 1].
    #[inline]
    pub fn fatigue(&self) -> f64 {
        self.fatigue
    }

    /// Reviews answered so far.
    #[inline]
    pub fn reviews(&self) -> u32 {
        self.reviews
    }

    /// Charge the cost of one answered card.
    pub(crate) fn record_review(&mut self, grade: Grade, costs: &FatigueCosts) {
        let cost = match grade {
            Grade::Fail => costs.fail,
            Grade::Hard => costs.hard,
            _ => costs.other,
        };
        self.fatigue = (self.fatigue + cost).clamp(0.0, 1.0);
        self.reviews += 1;
    }
}
