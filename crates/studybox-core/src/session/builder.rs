//! Session building
//!
//! One builder, pluggable selection policy. The builder owns the pipeline
//! every queue shares:
//!
//! 1. drop suspended cards and cards outside the deck filter
//! 2. compute each card's current risk
//! 3. ask the [`SelectionStrategy`] for a priority (or exclusion)
//! 4. sort by priority, highest first
//! 5. truncate to the limit and attach an [`Explanation`]
//!
//! [`StudyQueue`] is the regular session. [`FocusQueue`] is the
//! "what am I about to forget" drill that skips new material.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::explain::{explain, Explanation};
use crate::card::{Card, CognitiveStage};
use crate::config::SchedulerConfig;
use crate::scheduler::risk;

/// Priority given to never-consolidated cards in the study queue
pub const NEW_CARD_PRIORITY: f64 = 2.0;

/// Priority boost for cards past their scheduled review
pub const OVERDUE_BOOST: f64 = 0.5;

/// Days overdue at which the focus queue's overdue boost saturates
pub const FOCUS_OVERDUE_SATURATION_DAYS: f64 = 7.0;

/// Focus-queue boost for lapsed cards
pub const FOCUS_LAPSE_BOOST: f64 = 0.25;

/// Default number of cards in a session
pub const DEFAULT_SESSION_LIMIT: usize = 20;

// ============================================================================
// SCOPE AND OUTPUT
// ============================================================================

/// Which cards a session may draw from, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScope {
    /// Restrict to these decks; `None` means every deck
    #[serde(default)]
    pub deck_ids: Option<HashSet<Uuid>>,
    pub limit: usize,
}

impl Default for SessionScope {
    fn default() -> Self {
        Self {
            deck_ids: None,
            limit: DEFAULT_SESSION_LIMIT,
        }
    }
}

impl SessionScope {
    pub fn all(limit: usize) -> Self {
        Self {
            deck_ids: None,
            limit,
        }
    }

    pub fn decks(deck_ids: impl IntoIterator<Item = Uuid>, limit: usize) -> Self {
        Self {
            deck_ids: Some(deck_ids.into_iter().collect()),
            limit,
        }
    }

    fn includes(&self, card: &Card) -> bool {
        self.deck_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&card.deck_id))
    }
}

/// One entry of a built session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCard {
    pub card: Card,
    pub priority_score: f64,
    pub risk: f64,
    pub explanation: Explanation,
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Decides whether a card belongs in a queue and how urgently.
pub trait SelectionStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Priority of `card` given its current `risk`, or `None` to leave it out.
    fn priority(
        &self,
        card: &Card,
        risk: f64,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Option<f64>;
}

/// The regular study session: new material first, then due cards by risk,
/// with overdue cards boosted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyQueue;

impl SelectionStrategy for StudyQueue {
    fn name(&self) -> &'static str {
        "study"
    }

    fn priority(
        &self,
        card: &Card,
        risk: f64,
        now: DateTime<Utc>,
        _config: &SchedulerConfig,
    ) -> Option<f64> {
        if card.is_new() {
            return Some(NEW_CARD_PRIORITY);
        }
        if !card.is_due(now) {
            return None;
        }
        if card.is_overdue(now) {
            Some(risk + OVERDUE_BOOST)
        } else {
            Some(risk)
        }
    }
}

/// A review-only drill for cards that are due or already fading.
///
/// New cards are skipped. Overdue cards gain up to +0.5 over a week, and
/// lapsed cards get a flat +0.25.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusQueue;

impl SelectionStrategy for FocusQueue {
    fn name(&self) -> &'static str {
        "focus"
    }

    fn priority(
        &self,
        card: &Card,
        risk: f64,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Option<f64> {
        if card.is_new() {
            return None;
        }
        if !card.is_due(now) && risk <= config.focus_risk_threshold {
            return None;
        }

        let overdue =
            (card.days_overdue(now) / FOCUS_OVERDUE_SATURATION_DAYS).min(1.0) * OVERDUE_BOOST;
        let lapse = if card.stage() == CognitiveStage::Lapse {
            FOCUS_LAPSE_BOOST
        } else {
            0.0
        };
        Some(risk + overdue + lapse)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds bounded, priority-ordered study queues.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder<S = StudyQueue> {
    strategy: S,
}

impl<S: SelectionStrategy> SessionBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Rank `cards` into a queue of at most `scope.limit` entries.
    pub fn build(
        &self,
        cards: &[Card],
        scope: &SessionScope,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Vec<SessionCard> {
        if scope.limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(&Card, f64, f64)> = cards
            .iter()
            .filter(|card| !card.suspended && scope.includes(card))
            .filter_map(|card| {
                let r = risk(card, now, config);
                self.strategy
                    .priority(card, r, now, config)
                    .map(|priority| (card, priority, r))
            })
            .collect();

        let candidates = ranked.len();

        ranked.sort_by(|(a, pa, _), (b, pb, _)| {
            pb.total_cmp(pa)
                .then_with(|| compare_next_review(a, b))
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(scope.limit);

        tracing::debug!(
            strategy = self.strategy.name(),
            pool = cards.len(),
            candidates,
            selected = ranked.len(),
            "Session built"
        );

        ranked
            .into_iter()
            .map(|(card, priority, r)| SessionCard {
                explanation: explain(card, r, now, config),
                card: card.clone(),
                priority_score: priority,
                risk: r,
            })
            .collect()
    }
}

/// Earlier scheduled reviews first; unscheduled cards lead.
fn compare_next_review(a: &Card, b: &Card) -> Ordering {
    match (a.next_review(), b.next_review()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

// ============================================================================
// TESTS
// ============================================================================
