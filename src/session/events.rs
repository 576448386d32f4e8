//! Session Event Types

use std::sync::Arc;

use crate::store::Mood;

/// An event emitted by a streaming session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Current mood at connect time
    Snapshot(Arc<Mood>),
    /// A mood committed after connect
    Update(Arc<Mood>),
    /// Idle heartbeat, carries no data
    KeepAlive,
}

impl SessionEvent {
    /// The mood carried by this event, if any
    pub fn mood(&self) -> Option<&Mood> {
        match self {
            SessionEvent::Snapshot(mood) | SessionEvent::Update(mood) => Some(mood),
            SessionEvent::KeepAlive => None,
        }
    }

    /// Check if this is a heartbeat
    pub fn is_keep_alive(&self) -> bool {
        matches!(self, SessionEvent::KeepAlive)
    }
}
