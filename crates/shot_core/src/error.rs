use thiserror::Error;

use crate::models::{EventId, GameId};

/// Errors raised while turning a raw game document into feature rows.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Game not found: {0}")]
    NotFound(GameId),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Malformed event {event_id:?}: {reason}")]
    MalformedEvent {
        event_id: Option<EventId>,
        reason: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("No game count known for season {0}")]
    UnknownSeason(u32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub(crate) fn malformed_event(event_id: Option<EventId>, reason: impl Into<String>) -> Self {
        ExtractError::MalformedEvent {
            event_id,
            reason: reason.into(),
        }
    }

    /// Whether the rest of the game (or batch) can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ExtractError::MalformedEvent { .. } => true, // drop the play, keep the game
            ExtractError::NotFound(_) => true,
            ExtractError::MalformedDocument(_) => true,
            ExtractError::Deserialization(_) => true,
            ExtractError::Io(_) => true,
            ExtractError::UnknownSeason(_) => true,
            ExtractError::Config(_) => false,
        }
    }
}

/// Errors raised by a [`TableStore`](crate::source::TableStore) backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("No table stored under '{0}'")]
    Missing(String),

    #[error("Invalid key: '{0}'")]
    InvalidKey(String),
}

/// Errors raised by the table assembly/encoding stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Column '{column}' has no non-null values to fill from")]
    UnrecoverableColumn { column: String },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid split: {0}")]
    InvalidSplit(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
