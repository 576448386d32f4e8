//! Mood Store Engine
//!
//! Holds the current mood and fans every update out to the registered
//! subscribers over bounded tokio channels.
//!
//! Locking: one mutex guards the subscriber map and serializes `set`,
//! `subscribe` and `unsubscribe`. The current value sits behind its own
//! `RwLock`, so `get` never waits on a fan-out loop. Lock order is always
//! subscribers → current.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use super::error::{MoodError, StoreResult};
use super::types::Mood;

/// Unique identifier for a subscriber
pub type SubscriberId = Uuid;

/// Mood store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Mood the store starts with
    #[serde(default = "default_mood")]
    pub default_mood: String,

    /// Capacity of each subscriber's delivery channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Maximum number of concurrent subscribers
    #[serde(default = "default_max_subscribers")]
    pub max_subscribers: usize,
}

fn default_mood() -> String {
    "neutral".to_string()
}

fn default_channel_capacity() -> usize {
    16
}

fn default_max_subscribers() -> usize {
    1000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_mood: default_mood(),
            channel_capacity: default_channel_capacity(),
            max_subscribers: default_max_subscribers(),
        }
    }
}

impl StoreConfig {
    /// Create config with a custom default mood
    pub fn with_default_mood(mood: impl Into<String>) -> Self {
        Self {
            default_mood: mood.into(),
            ..Default::default()
        }
    }
}

/// A registered subscriber's view of the store
#[derive(Debug)]
pub struct Subscription {
    /// Id to pass back to `unsubscribe`
    pub id: SubscriberId,
    /// Every update committed after registration, in commit order
    pub receiver: mpsc::Receiver<Arc<Mood>>,
    /// Current mood at the moment of registration
    pub snapshot: Arc<Mood>,
}

/// In-memory mood store with broadcast to subscribers
pub struct MoodStore {
    current: RwLock<Arc<Mood>>,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Arc<Mood>>>>,
    config: StoreConfig,
}

impl MoodStore {
    /// Create a store holding the configured default mood
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let initial = Mood::new(&config.default_mood)?;

        tracing::debug!(
            default_mood = %initial.value,
            channel_capacity = config.channel_capacity,
            max_subscribers = config.max_subscribers,
            "Mood store created"
        );

        Ok(Self {
            current: RwLock::new(Arc::new(initial)),
            subscribers: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Get the store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current mood
    pub fn get(&self) -> Mood {
        self.snapshot().as_ref().clone()
    }

    /// Shared handle to the current mood
    pub fn snapshot(&self) -> Arc<Mood> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Replace the current mood and deliver it to every subscriber
    ///
    /// Delivery never waits: a subscriber whose channel is full misses this
    /// update, and a subscriber whose receiver is gone is pruned. Returns the
    /// committed mood once every send has been attempted.
    pub fn set(&self, value: impl AsRef<str>) -> StoreResult<Mood> {
        let mood = Arc::new(Mood::new(value)?);

        let mut subscribers = self.lock_subscribers();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&mood);

        let mut delivered = 0usize;
        let mut dropped = 0usize;
        let before = subscribers.len();

        subscribers.retain(|id, sender| match sender.try_send(Arc::clone(&mood)) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                dropped += 1;
                tracing::debug!(subscriber_id = %id, "Subscriber channel full, update dropped");
                true
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(subscriber_id = %id, "Subscriber channel closed, pruning");
                false
            }
        });

        let pruned = before - subscribers.len();
        drop(subscribers);

        tracing::info!(
            mood = %mood.value,
            delivered,
            dropped,
            pruned,
            "Mood updated"
        );

        Ok(mood.as_ref().clone())
    }

    /// Register a new subscriber
    ///
    /// The snapshot is taken under the same lock that `set` holds while
    /// committing, so every update is either in the snapshot or delivered on
    /// the channel, never both and never neither.
    pub fn subscribe(&self) -> StoreResult<Subscription> {
        let mut subscribers = self.lock_subscribers();
        if subscribers.len() >= self.config.max_subscribers {
            tracing::warn!(
                limit = self.config.max_subscribers,
                "Subscriber limit reached"
            );
            return Err(MoodError::TooManySubscribers {
                limit: self.config.max_subscribers,
            });
        }

        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(self.config.channel_capacity.max(1));
        let snapshot = self.snapshot();
        subscribers.insert(id, sender);
        let count = subscribers.len();
        drop(subscribers);

        tracing::debug!(subscriber_id = %id, subscribers = count, "Subscriber registered");

        Ok(Subscription {
            id,
            receiver,
            snapshot,
        })
    }

    /// Remove a subscriber
    ///
    /// Unknown ids are ignored, so racing cleanup paths are harmless.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.lock_subscribers();
        let removed = subscribers.remove(&id).is_some();
        let count = subscribers.len();
        drop(subscribers);

        if removed {
            tracing::debug!(subscriber_id = %id, subscribers = count, "Subscriber removed");
        }
        removed
    }

    /// Get the current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<Arc<Mood>>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
