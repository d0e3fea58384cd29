//! Unified error types for Longan operations.
//!
//! Every fallible operation in the crate reports through this single error
//! enum, so callers at the store/export boundary see a consistent API.
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Deck id could not be resolved
    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    /// Slide id could not be resolved within a deck
    #[error("Slide not found: {slide_id} in deck {deck_id}")]
    SlideNotFound { deck_id: String, slide_id: String },

    /// A patch payload violates the type-dependent content contract
    #[error("Invalid slide content: {0}")]
    InvalidContent(String),

    /// Optimistic-concurrency check failed; caller must reload and retry
    #[error("Version conflict on deck {deck_id}: expected {expected}, found {actual}")]
    VersionConflict {
        deck_id: String,
        expected: u64,
        actual: u64,
    },

    /// XML generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// External format-conversion step errored or timed out
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Error reported by the persistence collaborator
    #[error("Store error: {0}")]
    Store(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
