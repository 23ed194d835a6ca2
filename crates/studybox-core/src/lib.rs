//! # Studybox Core
//!
//! Adaptive spaced-repetition scheduling engine. Given a card's memory model
//! and a graded answer, it decides how the card's memory changed, when the
//! card should come back, and which cards deserve attention right now.
//!
//! - **Risk model**: two-phase forgetting curve. Minutes-scale decay while a
//!   card is being acquired, days-scale power decay once it has stability.
//! - **Difficulty**: grade-driven update with a latency penalty for hesitant
//!   correct answers (audio cards exempt).
//! - **Cognitive stages**: acquisition, fixation, consolidation, retention,
//!   and lapse, driven by stability thresholds.
//! - **Safe intervals**: the next review lands where the forgetting risk
//!   reaches the configured target (10% by default).
//! - **Fatigue**: a per-session context that dampens recovery after failures
//!   late in a long session.
//! - **Sessions**: ranked, bounded study queues with explanations, and a
//!   focus drill for cards about to be forgotten.
//! - **Deck health**: a 0-100 score with a stage distribution.
//! - **Interop**: semicolon-delimited import and export with deck paths.
//!
//! ## Quick Start
//!
//! ```rust
//! use studybox_core::{Collection, Grade, SchedulerConfig, SessionScope, StudyEngine};
//!
//! let engine = StudyEngine::new(SchedulerConfig::default())?;
//! let mut collection = Collection::new();
//! let id = engine.new_card(&mut collection, "Languages::German", "der Hund", "the dog");
//!
//! let mut session = engine.start_session();
//! let queue = engine.build_session(collection.cards(), &SessionScope::default());
//! assert_eq!(queue[0].card.id, id);
//!
//! let outcome = engine.review(&mut collection, id, Grade::Good, 3.2, &mut session)?;
//! println!("{}", outcome.message);
//! # Ok::<(), studybox_core::EngineError>(())
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod clock;
pub mod collection;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod health;
pub mod interop;
pub mod scheduler;
pub mod session;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Cards
pub use card::{
    AudioClip, Card, CardContent, CardStatus, CognitiveStage, Grade, Metrics, OcclusionRect,
    ReviewLogEntry, MAX_DIFFICULTY, MIN_COMPLEXITY, MIN_DIFFICULTY,
};

// Scheduling
pub use scheduler::{
    format_interval, long_term_risk, next_difficulty, retrievability, risk, safe_interval_days,
    short_term_risk, transition, ReviewOutcome, ReviewProcessor, StageTransition,
};

// Sessions
pub use session::{
    explain, Explanation, FocusQueue, SelectionStrategy, SessionBuilder, SessionCard,
    SessionScope, StudyQueue, StudySession, VisualCue,
};

// Decks, collection, health
pub use collection::Collection;
pub use deck::{Deck, DeckTree};
pub use health::{DeckHealth, StageDistribution};

// Import / export
pub use interop::{
    export_delimited, export_to_string, import_rows, parse_delimited, ImportReport, ImportRow,
};

// Ambient
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SchedulerConfig;
pub use engine::StudyEngine;
pub use error::{EngineError, Result};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Card, CardStatus, Clock, CognitiveStage, Collection, DeckHealth, EngineError, Grade,
        Result, ReviewOutcome, SchedulerConfig, SessionCard, SessionScope, StudyEngine,
        StudySession, SystemClock,
    };
}
