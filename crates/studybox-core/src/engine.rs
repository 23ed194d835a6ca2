//! StudyEngine - one handle over the scheduling components
//!
//! Binds a [`SchedulerConfig`] and a [`Clock`] so callers do not have to
//! thread `now` and the config through every call. The components stay
//! usable on their own; the engine only supplies those two inputs.

use uuid::Uuid;

use crate::card::{Card, Grade};
use crate::clock::{Clock, SystemClock};
use crate::collection::Collection;
use crate::config::SchedulerConfig;
use crate::error::{EngineError, Result};
use crate::health::{analyze, DeckHealth};
use crate::interop::{export_to_string, import_rows, parse_delimited, ImportReport};
use crate::scheduler::{risk, ReviewOutcome, ReviewProcessor};
use crate::session::{FocusQueue, SessionBuilder, SessionCard, SessionScope, StudyQueue, StudySession};

/// The scheduling engine.
#[derive(Debug, Clone)]
pub struct StudyEngine<C: Clock = SystemClock> {
    config: SchedulerConfig,
    clock: C,
}

impl StudyEngine<SystemClock> {
    /// Engine on the system clock.
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> StudyEngine<C> {
    /// Engine on a caller-supplied clock. The config is validated first.
    pub fn with_clock(config: SchedulerConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// A fresh session with zero fatigue.
    pub fn start_session(&self) -> StudySession {
        StudySession::new(self.clock.now())
    }

    /// Current forgetting risk of `card`.
    pub fn risk(&self, card: &Card) -> f64 {
        risk(card, self.clock.now(), &self.config)
    }

    // ========================================================================
    // REVIEWS
    // ========================================================================

    /// Review a detached card; the input is left unchanged.
    pub fn review_card(
        &self,
        card: &Card,
        grade: Grade,
        time_to_recall: f64,
        session: &mut StudySession,
    ) -> ReviewOutcome {
        ReviewProcessor::new(&self.config).review(card, grade, time_to_recall, session, self.clock.now())
    }

    /// Review a card stored in `collection` and store the result.
    pub fn review(
        &self,
        collection: &mut Collection,
        card_id: Uuid,
        grade: Grade,
        time_to_recall: f64,
        session: &mut StudySession,
    ) -> Result<ReviewOutcome> {
        collection.review(card_id, grade, time_to_recall, session, self.clock.now(), &self.config)
    }

    /// [`StudyEngine::review`] with a raw numeric grade (1..=4).
    pub fn review_raw(
        &self,
        collection: &mut Collection,
        card_id: Uuid,
        grade: i32,
        time_to_recall: f64,
        session: &mut StudySession,
    ) -> Result<ReviewOutcome> {
        let grade = Grade::from_i32(grade).ok_or(EngineError::InvalidGrade(grade))?;
        self.review(collection, card_id, grade, time_to_recall, session)
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    /// Regular study queue over `cards`.
    pub fn build_session(&self, cards: &[Card], scope: &SessionScope) -> Vec<SessionCard> {
        SessionBuilder::new(StudyQueue).build(cards, scope, self.clock.now(), &self.config)
    }

    /// Review-only drill of due and fading cards.
    pub fn build_focus_session(&self, cards: &[Card], scope: &SessionScope) -> Vec<SessionCard> {
        SessionBuilder::new(FocusQueue).build(cards, scope, self.clock.now(), &self.config)
    }

    /// Scope covering `deck_path` and its subdecks.
    pub fn deck_scope(&self, collection: &Collection, deck_path: &str, limit: usize) -> Result<SessionScope> {
        let deck_id = collection.deck_id(deck_path)?;
        Ok(SessionScope::decks(collection.decks().subtree(deck_id), limit))
    }

    // ========================================================================
    // DECKS
    // ========================================================================

    /// Health of the deck at `deck_path`, subdecks included.
    pub fn deck_health(&self, collection: &Collection, deck_path: &str) -> Result<DeckHealth> {
        let deck_id = collection.deck_id(deck_path)?;
        let descendants = collection.decks().descendants(deck_id);
        Ok(analyze(collection.cards(), deck_id, &descendants, self.clock.now(), &self.config))
    }

    /// Add a plain new card to `deck_path`.
    pub fn new_card(
        &self,
        collection: &mut Collection,
        deck_path: &str,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Uuid {
        collection.new_card(deck_path, front, back, self.clock.now(), &self.config)
    }

    // ========================================================================
    // INTEROP
    // ========================================================================

    /// Parse delimited text and add its rows to `collection`.
    pub fn import(&self, collection: &mut Collection, text: &str) -> Result<ImportReport> {
        let rows = parse_delimited(text)?;
        import_rows(rows, collection, self.clock.now(), &self.config)
    }

    /// Export `collection`, optionally limited to one deck subtree.
    pub fn export(&self, collection: &Collection, deck_path: Option<&str>) -> Result<String> {
        let deck = deck_path.map(|p| collection.deck_id(p)).transpose()?;
        export_to_string(collection, deck)
    }
}
