//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::session::DEFAULT_HEARTBEAT_INTERVAL;
use crate::store::MoodBackend;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Mood store every handler reads from and writes to
    pub store: Arc<dyn MoodBackend>,
    /// Keep-alive interval for streaming sessions
    pub heartbeat_interval: Duration,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Cancelled on shutdown; every streaming session holds a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create a new AppState with the default heartbeat interval
    pub fn new(store: Arc<dyn MoodBackend>) -> Self {
        Self::with_heartbeat(store, DEFAULT_HEARTBEAT_INTERVAL)
    }

    /// Create AppState with a custom heartbeat interval
    pub fn with_heartbeat(store: Arc<dyn MoodBackend>, heartbeat_interval: Duration) -> Self {
        Self {
            store,
            heartbeat_interval,
            start_time: Instant::now(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get the number of open streaming sessions
    pub fn stream_count(&self) -> usize {
        self.store.subscriber_count()
    }
}
