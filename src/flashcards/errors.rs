//! Flashcard engine error types

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the engine itself (parsing, materialization, scheduling)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlashcardError {
    #[error("No cloze deletion found in text")]
    NoClozeFound,

    #[error("Card {card_id} has no practice unit {card_index} (it has {unit_count})")]
    IndexOutOfRange {
        card_id: Uuid,
        card_index: usize,
        unit_count: usize,
    },

    #[error("Invalid card type: {0}")]
    InvalidCardType(String),

    #[error("Card type {card_type} requires field '{field}'")]
    MissingField {
        card_type: &'static str,
        field: &'static str,
    },

    #[error("Invalid quality {0}: expected 0 (again), 1 (hard), 2 (good) or 3 (easy)")]
    InvalidQuality(i64),

    #[error("Invalid quality '{0}': expected again, hard, good or easy")]
    InvalidQualityName(String),

    #[error("Invalid cloze selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid cloze group number: {0}")]
    InvalidGroup(u32),

    #[error("Invalid interval table: {0}")]
    InvalidIntervals(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, FlashcardError>;
