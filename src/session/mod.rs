//! Streaming Sessions
//!
//! One `BroadcastSession` per connected streaming client. The session
//! subscribes on open, yields the snapshot first, then forwards updates and
//! keep-alive heartbeats until it is cancelled or dropped. Dropping the
//! session always releases its store subscription.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use emotibot_relay::session::{BroadcastSession, DEFAULT_HEARTBEAT_INTERVAL};
//! use emotibot_relay::store::{MoodBackend, MoodStore, StoreConfig};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn MoodBackend> = Arc::new(MoodStore::new(StoreConfig::default())?);
//! let mut session = BroadcastSession::open(
//!     Arc::clone(&store),
//!     DEFAULT_HEARTBEAT_INTERVAL,
//!     CancellationToken::new(),
//! )?;
//!
//! while let Some(event) = session.next_event().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod broadcast;
mod events;

pub use broadcast::{
    BroadcastSession, EventSink, SessionError, DEFAULT_HEARTBEAT_INTERVAL, MIN_HEARTBEAT_INTERVAL,
};
pub use events::SessionEvent;
