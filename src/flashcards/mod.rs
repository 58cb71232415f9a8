//! Flashcard engine
//!
//! This module provides:
//! - Cloze deletion parsing and rendering (`{{cN::word}}`)
//! - Practice card materialization for every card type
//! - Stateless spaced repetition scheduling
//! - Review record packaging
//! - A reference JSON-file card store

pub mod algorithm;
pub mod cloze;
pub mod errors;
pub mod models;
pub mod practice;
pub mod render;
pub mod review;
pub mod storage;

pub use errors::FlashcardError;
pub use models::*;
pub use storage::{CardStore, FlashcardStorage, FlashcardStorageError};
