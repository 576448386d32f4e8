//! Stream Route
//!
//! - GET /mood/stream - Server-Sent Events feed of mood changes
//!
//! The current mood is sent immediately on connect. Every later change
//! follows as a `data:` event carrying the mood JSON. Idle streams get a
//! `: keep-alive` comment at the heartbeat interval.

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;

use crate::api::dto::StreamErrorPayload;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::session::{BroadcastSession, SessionEvent};

/// GET /mood/stream
///
/// The session lives inside the response stream. When the client goes away
/// hyper drops the stream, which drops the session and releases its
/// subscription.
pub async fn stream_mood(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let session = BroadcastSession::open(
        Arc::clone(&state.store),
        state.heartbeat_interval,
        state.shutdown.child_token(),
    )?;

    let events = session.into_stream().map(|event| Ok(to_sse_event(event)));
    Ok(Sse::new(events))
}

/// Encode a session event as an SSE frame
fn to_sse_event(event: SessionEvent) -> Event {
    match event {
        SessionEvent::KeepAlive => Event::default().comment("keep-alive"),
        SessionEvent::Snapshot(mood) | SessionEvent::Update(mood) => {
            match Event::default().json_data(mood.as_ref()) {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode mood event");
                    error_event(&e.to_string())
                }
            }
        }
    }
}

fn error_event(message: &str) -> Event {
    let payload = StreamErrorPayload {
        error: message.to_string(),
    };
    let data = serde_json::to_string(&payload)
        .unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string());
    Event::default().event("error").data(data)
}
