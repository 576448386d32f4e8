//! Broadcast Session
//!
//! Bridges one store subscription to one outbound stream of events.

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::events::SessionEvent;
use crate::store::{Mood, MoodBackend, StoreResult, SubscriberId, Subscription};

/// Heartbeat interval used when none is configured
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Shortest heartbeat interval a session will use
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(1);

/// Destination for session events (an SSE response, a test channel, ...)
#[async_trait]
pub trait EventSink: Send {
    /// Write one event to the client transport
    async fn send(&mut self, event: SessionEvent) -> Result<(), SessionError>;
}

#[async_trait]
impl EventSink for mpsc::Sender<SessionEvent> {
    async fn send(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        mpsc::Sender::send(&*self, event)
            .await
            .map_err(|_| SessionError::Transport("receiver closed".to_string()))
    }
}

/// One streaming client's subscription lifecycle
///
/// The subscription is released when the session is dropped, whichever way
/// the session ends.
pub struct BroadcastSession {
    id: SubscriberId,
    store: Arc<dyn MoodBackend>,
    receiver: mpsc::Receiver<Arc<Mood>>,
    snapshot: Option<Arc<Mood>>,
    heartbeat: Interval,
    cancel: CancellationToken,
    created_at: Instant,
    finished: bool,
}

impl BroadcastSession {
    /// Subscribe to the store and open a session
    ///
    /// Intervals shorter than [`MIN_HEARTBEAT_INTERVAL`] are raised to it.
    pub fn open(
        store: Arc<dyn MoodBackend>,
        heartbeat_interval: Duration,
        cancel: CancellationToken,
    ) -> StoreResult<Self> {
        let Subscription {
            id,
            receiver,
            snapshot,
        } = store.subscribe()?;

        let heartbeat_interval = heartbeat_interval.max(MIN_HEARTBEAT_INTERVAL);
        let created_at = Instant::now();
        let mut heartbeat = time::interval_at(created_at + heartbeat_interval, heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            subscriber_id = %id,
            mood = %snapshot.value,
            "Stream session opened"
        );

        Ok(Self {
            id,
            store,
            receiver,
            snapshot: Some(snapshot),
            heartbeat,
            cancel,
            created_at,
            finished: false,
        })
    }

    /// Subscriber id of this session
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// When the session was opened
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Token that ends this session when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the next event
    ///
    /// The first call returns the snapshot. Returns `None` once the session
    /// is cancelled or its subscription has been removed from the store.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if self.finished {
            return None;
        }

        if let Some(snapshot) = self.snapshot.take() {
            return Some(SessionEvent::Snapshot(snapshot));
        }

        let event = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            received = self.receiver.recv() => received.map(SessionEvent::Update),
            _ = self.heartbeat.tick() => Some(SessionEvent::KeepAlive),
        };

        match &event {
            Some(SessionEvent::Update(mood)) => {
                self.heartbeat.reset();
                tracing::trace!(subscriber_id = %self.id, mood = %mood.value, "Forwarding update");
            }
            Some(SessionEvent::KeepAlive) => {
                tracing::trace!(subscriber_id = %self.id, "Heartbeat");
            }
            Some(SessionEvent::Snapshot(_)) => {}
            None => self.finished = true,
        }

        event
    }

    /// Drive the session into a sink until it ends
    ///
    /// Returns the number of events written. A sink error ends only this
    /// session.
    pub async fn run<S: EventSink>(mut self, sink: &mut S) -> Result<u64, SessionError> {
        let mut sent = 0u64;

        while let Some(event) = self.next_event().await {
            if let Err(e) = sink.send(event).await {
                tracing::debug!(
                    subscriber_id = %self.id,
                    error = %e,
                    "Transport write failed, closing session"
                );
                return Err(e);
            }
            sent += 1;
        }

        Ok(sent)
    }

    /// Turn the session into a stream of events
    ///
    /// Dropping the stream drops the session.
    pub fn into_stream(self) -> impl Stream<Item = SessionEvent> + Send + 'static {
        stream::unfold(self, |mut session| async move {
            session.next_event().await.map(|event| (event, session))
        })
    }
}

impl Drop for BroadcastSession {
    fn drop(&mut self) {
        self.store.unsubscribe(self.id);

        tracing::info!(
            subscriber_id = %self.id,
            lifetime_ms = self.created_at.elapsed().as_millis() as u64,
            "Stream session closed"
        );
    }
}

/// Errors that end a single session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Transport error: {0}")]
    Transport(String),
}
