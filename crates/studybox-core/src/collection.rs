//! Collection - cards and decks held in memory
//!
//! The engine itself never touches storage. A [`Collection`] is the
//! container the import bridge fills and the export bridge reads, and it can
//! be snapshotted to JSON by a host that wants to keep state between runs.

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{Card, Grade};
use crate::config::SchedulerConfig;
use crate::deck::DeckTree;
use crate::error::{EngineError, Result};
use crate::scheduler::{ReviewOutcome, ReviewProcessor};
use crate::session::StudySession;

/// Cards plus the deck hierarchy they live in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default)]
    decks: DeckTree,
    #[serde(default)]
    cards: Vec<Card>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decks(&self) -> &DeckTree {
        &self.decks
    }

    pub fn decks_mut(&mut self) -> &mut DeckTree {
        &mut self.decks
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Insert a card. Its deck must already exist.
    pub fn add_card(&mut self, card: Card) -> Result<Uuid> {
        if self.decks.get(card.deck_id).is_none() {
            return Err(EngineError::DeckNotFound(card.deck_id.to_string()));
        }
        let id = card.id;
        self.cards.push(card);
        Ok(id)
    }

    /// Create a plain new card in `deck_path`, creating decks as needed.
    pub fn new_card(
        &mut self,
        deck_path: &str,
        front: impl Into<String>,
        back: impl Into<String>,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Uuid {
        let deck_id = self.decks.ensure_path(deck_path, now);
        let mut card = Card::new(deck_id, front, back, now);
        card.metrics.difficulty = config.initial_difficulty;
        let id = card.id;
        self.cards.push(card);
        id
    }

    /// Remove a card, returning it.
    pub fn remove_card(&mut self, id: Uuid) -> Result<Card> {
        let pos = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(EngineError::CardNotFound(id))?;
        Ok(self.cards.remove(pos))
    }

    /// Suspend or unsuspend a card.
    pub fn set_suspended(&mut self, id: Uuid, suspended: bool) -> Result<()> {
        let card = self.get_mut(id).ok_or(EngineError::CardNotFound(id))?;
        card.suspended = suspended;
        Ok(())
    }

    /// Resolve a deck path, failing if it does not exist.
    pub fn deck_id(&self, path: &str) -> Result<Uuid> {
        self.decks
            .find_path(path)
            .ok_or_else(|| EngineError::DeckNotFound(path.to_string()))
    }

    /// Cards in `deck_id` and every deck below it.
    pub fn cards_in(&self, deck_id: Uuid) -> Vec<&Card> {
        let scope = self.decks.subtree(deck_id);
        self.cards
            .iter()
            .filter(|c| scope.contains(&c.deck_id))
            .collect()
    }

    /// Review a stored card and replace it with the updated copy.
    pub fn review(
        &mut self,
        id: Uuid,
        grade: Grade,
        time_to_recall: f64,
        session: &mut StudySession,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Result<ReviewOutcome> {
        let slot = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EngineError::CardNotFound(id))?;
        let outcome = ReviewProcessor::new(config).review(slot, grade, time_to_recall, session, now);
        *slot = outcome.card.clone();
        Ok(outcome)
    }

    // ========================================================================
    // JSON SNAPSHOT
    // ========================================================================

    /// Read a snapshot previously written by [`Collection::write_json`].
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write a pretty-printed snapshot.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
