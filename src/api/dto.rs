//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::store::Mood;

/// Mood update request body
#[derive(Debug, Serialize, Deserialize)]
pub struct MoodUpdateRequest {
    /// The new mood value to set
    pub mood: String,
}

/// Response for mood endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MoodResponse {
    /// The current mood state
    pub mood: Mood,
}

/// Root status response
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Open streaming sessions
    pub streams: usize,
}

/// Payload of an `error` event on the stream
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamErrorPayload {
    pub error: String,
}
