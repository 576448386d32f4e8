//! Relay Client
//!
//! HTTP and SSE client for talking to a running relay.
//!
//! - **http**: `MoodClient` for `GET /mood`, `PUT /mood` and `GET /mood/stream`
//! - **sse**: Incremental Server-Sent Events decoder

mod http;
mod sse;

pub use http::{parse_frame, ClientError, MoodClient, MoodStream, StreamMessage, DEFAULT_BASE_URL};
pub use sse::{SseDecoder, SseFrame};
