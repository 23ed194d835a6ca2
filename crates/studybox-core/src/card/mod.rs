//! Card Module
//!
//! The memorization item and the small vocabularies around it:
//! - [`Grade`]: the 4-point answer scale
//! - [`CognitiveStage`]: the five maturity states a card moves through
//! - [`CardStatus`]: the coarse new/learning/review label shown to users
//! - [`CardContent`]: what kind of card it is, with per-variant payload
//! - [`Card`], [`Metrics`], [`ReviewLogEntry`]: the card and its memory model

mod content;
mod item;

pub use content::{AudioClip, CardContent, OcclusionRect};
pub use item::{Card, Metrics, ReviewLogEntry, MAX_DIFFICULTY, MIN_COMPLEXITY, MIN_DIFFICULTY};

use serde::{Deserialize, Serialize};

// ============================================================================
// GRADE
// ============================================================================

/// Answer grade on the 4-point ordinal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Could not recall
    Fail = 1,
    /// Recalled with serious effort
    Hard = 2,
    /// Recalled
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Grade {
    /// Parse the numeric grade (1..=4).
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Grade::Fail),
            2 => Some(Grade::Hard),
            3 => Some(Grade::Good),
            4 => Some(Grade::Easy),
            _ => None,
        }
    }

    /// Numeric value (1..=4).
    #[inline]
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Anything but a fail counts as a successful recall.
    #[inline]
    pub fn is_success(self) -> bool {
        self != Grade::Fail
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Fail => "fail",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// COGNITIVE STAGE
// ============================================================================

/// The maturity of a card's memory trace.
///
/// ```text
/// ACQUISITION -> FIXATION -> CONSOLIDATION -> RETENTION
///                    ^             |               |
///                    |             v               v
///                    +-------- LAPSE <-------------+
/// ```
///
/// Acquisition is the only initial state and no state is terminal. Lapse is
/// entered only by failing a card outside acquisition, and the next success
/// always returns it to at least fixation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CognitiveStage {
    /// First encounters, minutes-scale steps
    #[default]
    Acquisition,
    /// Freshly learned, short intervals
    Fixation,
    /// Stable for weeks
    Consolidation,
    /// Long-term memory, months between reviews
    Retention,
    /// Forgotten after having been learned
    Lapse,
}

impl CognitiveStage {
    /// Ordering used when upgrading by stability thresholds.
    ///
    /// Lapse sits below fixation so any threshold promotes out of it.
    #[inline]
    pub(crate) fn maturity(self) -> u8 {
        match self {
            CognitiveStage::Acquisition => 0,
            CognitiveStage::Lapse => 1,
            CognitiveStage::Fixation => 2,
            CognitiveStage::Consolidation => 3,
            CognitiveStage::Retention => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveStage::Acquisition => "acquisition",
            CognitiveStage::Fixation => "fixation",
            CognitiveStage::Consolidation => "consolidation",
            CognitiveStage::Retention => "retention",
            CognitiveStage::Lapse => "lapse",
        }
    }

    /// Get a human-readable description of the stage.
    pub fn description(&self) -> &'static str {
        match self {
            CognitiveStage::Acquisition => "Being learned for the first time",
            CognitiveStage::Fixation => "Recently learned, still fragile",
            CognitiveStage::Consolidation => "Settling into memory over weeks",
            CognitiveStage::Retention => "Held in long-term memory",
            CognitiveStage::Lapse => "Forgotten after being learned, relearning",
        }
    }
}

impl std::fmt::Display for CognitiveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CARD STATUS
// ============================================================================

/// Coarse scheduling status, denormalized onto the card for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Never reviewed
    #[default]
    New,
    /// Reviewed, still in acquisition
    Learning,
    /// Scheduled on the day scale
    Review,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::New => "new",
            CardStatus::Learning => "learning",
            CardStatus::Review => "review",
        }
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
