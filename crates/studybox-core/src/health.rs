//! Deck health
//!
//! A 0-100 score answering "how much of this deck is slipping?":
//! `100 - round(100 * critical / total)`, where a card is critical when it is
//! overdue or its forgetting risk exceeds the critical threshold (0.30).
//!
//! Suspended cards are counted in the distribution but left out of the
//! score, since the learner has chosen not to study them.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{Card, CardStatus};
use crate::config::SchedulerConfig;
use crate::scheduler::risk;

/// Score at or above which a deck is considered healthy
pub const HEALTHY_SCORE: u8 = 80;

/// Score at or above which a deck merely needs attention
pub const ATTENTION_SCORE: u8 = 50;

/// How many cards sit in each bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDistribution {
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub suspended: usize,
}

impl StageDistribution {
    pub fn total(&self) -> usize {
        self.new + self.learning + self.review + self.suspended
    }
}

/// Health report for one deck (and its descendants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckHealth {
    pub deck_id: Uuid,
    pub health_score: u8,
    pub status_message: String,
    pub distribution: StageDistribution,
    /// Cards counted as critical
    pub critical: usize,
    /// Cards the score is computed over (suspended excluded)
    pub total: usize,
}

/// Score the cards of `deck_id` and its `descendants`.
pub fn analyze(
    cards: &[Card],
    deck_id: Uuid,
    descendants: &[Uuid],
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> DeckHealth {
    let scope: HashSet<Uuid> = std::iter::once(deck_id)
        .chain(descendants.iter().copied())
        .collect();

    let mut distribution = StageDistribution::default();
    let mut critical = 0usize;
    let mut total = 0usize;

    for card in cards.iter().filter(|c| scope.contains(&c.deck_id)) {
        if card.suspended {
            distribution.suspended += 1;
            continue;
        }

        match card.status() {
            CardStatus::New => distribution.new += 1,
            CardStatus::Learning => distribution.learning += 1,
            CardStatus::Review => distribution.review += 1,
        }

        total += 1;
        if card.is_overdue(now) || risk(card, now, config) > config.critical_risk {
            critical += 1;
        }
    }

    let health_score = score(critical, total);
    let status_message = status_message(health_score, total, critical);

    tracing::debug!(%deck_id, health_score, critical, total, "Deck health analyzed");

    DeckHealth {
        deck_id,
        health_score,
        status_message,
        distribution,
        critical,
        total,
    }
}

/// `100 - round(100 * critical / total)`; an empty deck is perfectly healthy.
pub fn score(critical: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let penalty = (100.0 * critical as f64 / total as f64).round() as i64;
    (100 - penalty).clamp(0, 100) as u8
}

fn status_message(score: u8, total: usize, critical: usize) -> String {
    if total == 0 {
        "No cards to study yet".to_string()
    } else if critical == 0 {
        "Everything is fresh".to_string()
    } else if score >= HEALTHY_SCORE {
        if critical == 1 {
            "Healthy: 1 card needs review".to_string()
        } else {
            format!("Healthy: {} cards need review", critical)
        }
    } else if score >= ATTENTION_SCORE {
        format!("Needs attention: {} cards slipping", critical)
    } else {
        format!("Critical: {} of {} cards at risk", critical, total)
    }
}
