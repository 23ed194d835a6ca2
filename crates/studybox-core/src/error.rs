//! Engine error type
//!
//! The scheduling math itself is total and never fails. Errors only arise at
//! the boundaries: looking up cards by id, loading configuration, and the
//! import/export bridges.

use uuid::Uuid;

/// Engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A review or lookup referenced a card the collection does not hold
    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
    /// A deck path or id could not be resolved
    #[error("Deck not found: {0}")]
    DeckNotFound(String),
    /// The import source contained no usable rows
    #[error("Import produced no cards (check the file's separator and columns)")]
    EmptyImport,
    /// Grade outside the 1..=4 scale
    #[error("Invalid grade {0}: expected 1 (fail) to 4 (easy)")]
    InvalidGrade(i32),
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Delimited-text parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;
