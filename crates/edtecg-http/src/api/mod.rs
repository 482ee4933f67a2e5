//! Typed wrappers over the EDTECG resource endpoints.
//!
//! Each wrapper borrows an [`crate::ApiClient`], so every call inherits
//! credential attachment and 401 recovery.

mod files;
mod flashcards;
mod mocks;

pub use files::{FileRecord, FileUpload, Files};
pub use flashcards::{Flashcard, FlashcardCollection, Flashcards};
pub use mocks::{Language, Mock, MockUpdate, Mocks, NewMock, QuizAnswer, QuizQuestion, Score};

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a server timestamp.
///
/// The API emits ISO-8601 timestamps with or without an offset; naive values
/// are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
