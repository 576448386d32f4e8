//! # EmotiBot Relay
//!
//! A mood relay service: one producer sets a shared mood value over HTTP, and
//! any number of Server-Sent Events clients are told about every change.
//!
//! ## Features
//!
//! - **Broadcast store**: Latest-value store with non-blocking fan-out
//! - **Streaming sessions**: Snapshot on connect, updates, keep-alive heartbeats
//! - **HTTP API**: `GET /mood`, `PUT /mood`, `GET /mood/stream` with Axum
//! - **CLI client**: `mood set`, `mood get`, `mood stream`
//!
//! ## Modules
//!
//! - [`store`]: Current mood and subscriber fan-out
//! - [`session`]: Per-client streaming lifecycle
//! - [`api`]: HTTP/SSE server
//! - [`client`]: HTTP/SSE client
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use emotibot_relay::store::{MoodStore, StoreConfig};
//!
//! let store = MoodStore::new(StoreConfig::default()).unwrap();
//! assert_eq!(store.get().value, "neutral");
//!
//! store.set("happy").unwrap();
//! assert_eq!(store.get().value, "happy");
//!
//! // Empty moods are rejected and leave the store untouched
//! assert!(store.set("").is_err());
//! assert_eq!(store.get().value, "happy");
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod session;
pub mod store;

// Re-export top-level types for convenience
pub use store::{Mood, MoodBackend, MoodError, MoodStore, StoreConfig, SubscriberId, Subscription};

pub use session::{BroadcastSession, EventSink, SessionError, SessionEvent};

pub use api::{build_router, serve, serve_on, ApiError, AppState};

pub use client::{ClientError, MoodClient, MoodStream, StreamMessage};

pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, StreamConfig};
