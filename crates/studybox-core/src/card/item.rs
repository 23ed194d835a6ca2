//! Card - The fundamental unit of study
//!
//! Each card carries:
//! - Content (front/back text and a typed variant)
//! - The memory model (difficulty, stability, complexity)
//! - Its cognitive stage
//! - Denormalized scheduling fields for the host UI
//! - An append-only review history
//!
//! Memory-model fields are only writable inside the crate. Callers change a
//! card's stage and stability by reviewing it, never by assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CardContent, CardStatus, CognitiveStage, Grade};
use crate::config::DEFAULT_INITIAL_DIFFICULTY;

/// Lower bound of the difficulty scale
pub const MIN_DIFFICULTY: f64 = 0.1;

/// Upper bound of the difficulty scale
pub const MAX_DIFFICULTY: f64 = 1.0;

/// Lower bound of the complexity modulator
pub const MIN_COMPLEXITY: f64 = 1.0;

// ============================================================================
// REVIEW LOG
// ============================================================================

/// One entry of a card's review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    pub timestamp: DateTime<Utc>,
    pub grade: Grade,
    /// Seconds between showing the card and the answer
    pub time_to_recall: f64,
    /// Session fatigue when the answer was given
    pub fatigue: f64,
    pub stability_before: f64,
    pub difficulty_before: f64,
    /// Forgetting risk at the moment of review
    pub calculated_risk: f64,
}

// ============================================================================
// METRICS
// ============================================================================

/// The per-card memory model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// 0.1 (easy) to 1.0 (hard)
    pub(crate) difficulty: f64,
    /// Days until retrievability decays to 90%
    pub(crate) stability: f64,
    /// Static divisor on stability, at least 1.0
    pub(crate) complexity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) history: Vec<ReviewLogEntry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_INITIAL_DIFFICULTY,
            stability: 0.0,
            complexity: MIN_COMPLEXITY,
            last_review: None,
            history: Vec::new(),
        }
    }
}

impl Metrics {
    #[inline]
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    #[inline]
    pub fn stability(&self) -> f64 {
        self.stability
    }

    #[inline]
    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    #[inline]
    pub fn last_review(&self) -> Option<DateTime<Utc>> {
        self.last_review
    }

    /// Review history, oldest first.
    #[inline]
    pub fn history(&self) -> &[ReviewLogEntry] {
        &self.history
    }

    /// Number of failed reviews after the card left acquisition.
    pub fn lapse_count(&self) -> usize {
        self.history
            .iter()
            .filter(|e| e.grade == Grade::Fail && e.stability_before > 0.0)
            .count()
    }
}

// ============================================================================
// CARD
// ============================================================================

/// A flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub content: CardContent,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Suspended cards are never offered in sessions
    #[serde(default)]
    pub suspended: bool,
    pub created_at: DateTime<Utc>,

    pub(crate) stage: CognitiveStage,
    pub(crate) metrics: Metrics,

    // ========== Denormalized scheduling ==========
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) next_review: Option<DateTime<Utc>>,
    /// Current delay in days (fractional during acquisition)
    #[serde(default)]
    pub(crate) interval: f64,
    #[serde(default)]
    pub(crate) repetitions: u32,
    #[serde(default)]
    pub(crate) status: CardStatus,
}

impl Card {
    /// Create a fresh card: acquisition stage, stability 0, difficulty 0.3,
    /// empty history.
    pub fn new(
        deck_id: Uuid,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front: front.into(),
            back: back.into(),
            content: CardContent::default(),
            tags: Vec::new(),
            suspended: false,
            created_at,
            stage: CognitiveStage::Acquisition,
            metrics: Metrics::default(),
            next_review: None,
            interval: 0.0,
            repetitions: 0,
            status: CardStatus::New,
        }
    }

    /// Set the content variant.
    pub fn with_content(mut self, content: CardContent) -> Self {
        self.content = content;
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the static complexity modulator (clamped to at least 1.0).
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.metrics.complexity = complexity.max(MIN_COMPLEXITY);
        self
    }

    #[inline]
    pub fn stage(&self) -> CognitiveStage {
        self.stage
    }

    #[inline]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[inline]
    pub fn next_review(&self) -> Option<DateTime<Utc>> {
        self.next_review
    }

    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    #[inline]
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    #[inline]
    pub fn status(&self) -> CardStatus {
        self.status
    }

    /// Never consolidated: still in acquisition with no stability.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.stage == CognitiveStage::Acquisition && self.metrics.stability <= 0.0
    }

    /// Due now: scheduled at or before `now`, or never scheduled.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.is_none_or(|at| at <= now)
    }

    /// Strictly past its scheduled review.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_review.is_some_and(|at| now > at)
    }

    /// Days past the scheduled review (0 when not overdue).
    pub fn days_overdue(&self, now: DateTime<Utc>) -> f64 {
        match self.next_review {
            Some(at) if now > at => (now - at).num_seconds() as f64 / 86_400.0,
            _ => 0.0,
        }
    }

    /// Instant the forgetting curve is measured from.
    #[inline]
    pub(crate) fn reference_time(&self) -> DateTime<Utc> {
        self.metrics.last_review.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
impl Card {
    /// Build a card directly in a given memory state.
    pub(crate) fn in_state(
        stage: CognitiveStage,
        stability: f64,
        difficulty: f64,
        last_review: DateTime<Utc>,
    ) -> Self {
        let mut card = Card::new(Uuid::new_v4(), "front", "back", last_review);
        card.stage = stage;
        card.metrics.stability = stability;
        card.metrics.difficulty = difficulty;
        card.metrics.last_review = Some(last_review);
        if stage != CognitiveStage::Acquisition {
            card.status = CardStatus::Review;
        }
        card
    }
}
