//! Core data types for the mood store
//!
//! A `Mood` is an opaque label plus the moment it was committed. The store
//! never holds an absent or empty mood.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{MoodError, StoreResult};

/// A mood state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mood {
    /// The mood label (e.g. "happy")
    pub value: String,
    /// Unix timestamp in seconds when the mood was set
    pub timestamp: f64,
}

impl Mood {
    /// Create a mood stamped with the current time
    ///
    /// Surrounding whitespace is trimmed; a label that is empty after
    /// trimming is rejected.
    pub fn new(value: impl AsRef<str>) -> StoreResult<Self> {
        let value = validate_mood(value.as_ref())?;
        Ok(Self {
            value: value.to_string(),
            timestamp: now_seconds(),
        })
    }

    /// Create a mood with a specific timestamp
    pub fn with_timestamp(value: impl AsRef<str>, timestamp: f64) -> StoreResult<Self> {
        let value = validate_mood(value.as_ref())?;
        Ok(Self {
            value: value.to_string(),
            timestamp,
        })
    }

    /// When the mood was set, if the timestamp is representable
    pub fn set_at(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() || self.timestamp <= 0.0 {
            return None;
        }
        let secs = self.timestamp.trunc() as i64;
        let nanos = (self.timestamp.fract() * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// Validate a mood label, returning the trimmed label
pub fn validate_mood(value: &str) -> StoreResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MoodError::InvalidMood("mood cannot be empty".to_string()));
    }
    Ok(trimmed)
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
