//! Mood store error types

use thiserror::Error;

/// Errors that can occur in the mood store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoodError {
    /// Mood label was empty or whitespace only
    #[error("Invalid mood: {0}")]
    InvalidMood(String),

    /// Subscriber limit reached
    #[error("Too many subscribers (limit: {limit})")]
    TooManySubscribers { limit: usize },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, MoodError>;
