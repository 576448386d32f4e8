//! EmotiBot Mood Store
//!
//! This module provides the in-process broadcast primitive at the heart of
//! the relay:
//!
//! - **types**: The `Mood` value and its validation rules
//! - **engine**: `MoodStore`, holding the current mood and the subscriber set
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   set(value) → validate → replace current → try_send to every subscriber
//!
//! Read Path:
//!   get() → snapshot of current (read lock only, never waits on fan-out)
//! ```
//!
//! # Example
//!
//! ```rust
//! use emotibot_relay::store::{MoodStore, StoreConfig};
//!
//! let store = MoodStore::new(StoreConfig::default()).unwrap();
//! let mut subscription = store.subscribe().unwrap();
//! assert_eq!(subscription.snapshot.value, "neutral");
//!
//! store.set("happy").unwrap();
//! assert_eq!(subscription.receiver.try_recv().unwrap().value, "happy");
//!
//! store.unsubscribe(subscription.id);
//! assert_eq!(store.subscriber_count(), 0);
//! ```

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{MoodStore, StoreConfig, SubscriberId, Subscription};
pub use error::{MoodError, StoreResult};
pub use types::Mood;

/// The four operations every mood backend provides.
///
/// `MoodStore` is the in-memory implementation. Handlers and sessions only
/// talk to this trait, so an externally backed store can be dropped in
/// without touching them.
pub trait MoodBackend: Send + Sync {
    /// Current mood value
    fn get(&self) -> Mood;

    /// Replace the current mood and fan it out to every subscriber
    fn set(&self, value: String) -> StoreResult<Mood>;

    /// Register a new subscriber
    fn subscribe(&self) -> StoreResult<Subscription>;

    /// Remove a subscriber. Returns `false` if the id was not registered.
    fn unsubscribe(&self, id: SubscriberId) -> bool;

    /// Number of currently registered subscribers
    fn subscriber_count(&self) -> usize;
}

impl MoodBackend for MoodStore {
    fn get(&self) -> Mood {
        MoodStore::get(self)
    }

    fn set(&self, value: String) -> StoreResult<Mood> {
        MoodStore::set(self, value)
    }

    fn subscribe(&self) -> StoreResult<Subscription> {
        MoodStore::subscribe(self)
    }

    fn unsubscribe(&self, id: SubscriberId) -> bool {
        MoodStore::unsubscribe(self, id)
    }

    fn subscriber_count(&self) -> usize {
        MoodStore::subscriber_count(self)
    }
}
