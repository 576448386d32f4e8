//! EmotiBot Relay HTTP Client
//!
//! Client for the relay's REST and SSE endpoints, used by the `mood` CLI.

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;

use super::sse::{SseDecoder, SseFrame};
use crate::api::dto::{MoodResponse, MoodUpdateRequest, StreamErrorPayload};
use crate::store::Mood;

/// Base URL used when none is given
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Relay API client
pub struct MoodClient {
    client: Client,
    base_url: String,
}

/// A message received on the mood stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    /// Snapshot or update
    Mood(Mood),
    /// Heartbeat comment
    KeepAlive,
    /// Error reported by the server
    ServerError(String),
}

impl MoodClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        // No overall timeout: the stream request stays open indefinitely
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /mood
    pub async fn get_mood(&self) -> Result<Mood, ClientError> {
        let response: MoodResponse = serde_json::from_value(self.get_mood_raw().await?)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(response.mood)
    }

    /// GET /mood, returning the body untouched
    pub async fn get_mood_raw(&self) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/mood", self.base_url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        let response = check_status(response)?;
        response.json().await.map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// PUT /mood
    pub async fn set_mood(&self, value: &str) -> Result<Mood, ClientError> {
        let url = format!("{}/mood", self.base_url);
        let body = MoodUpdateRequest {
            mood: value.to_string(),
        };

        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response)?;

        let result: MoodResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(result.mood)
    }

    /// GET /mood/stream
    pub async fn stream(&self) -> Result<MoodStream, ClientError> {
        let url = format!("{}/mood/stream", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response)?;

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(MoodStream {
            chunks,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
        })
    }
}

/// Open mood stream
pub struct MoodStream {
    chunks: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: SseDecoder,
    pending: VecDeque<SseFrame>,
}

impl MoodStream {
    /// Wait for the next message; `None` when the server closes the stream
    pub async fn next_message(&mut self) -> Option<Result<StreamMessage, ClientError>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Some(parse_frame(frame));
            }

            match self.chunks.next().await? {
                Ok(chunk) => self.pending.extend(self.decoder.feed(&chunk)),
                Err(e) => return Some(Err(ClientError::Request(e))),
            }
        }
    }
}

/// Interpret a decoded frame as a stream message
pub fn parse_frame(frame: SseFrame) -> Result<StreamMessage, ClientError> {
    let (event, data) = match frame {
        SseFrame::Comment(_) => return Ok(StreamMessage::KeepAlive),
        SseFrame::Event { event, data, .. } => (event, data),
    };

    let value: serde_json::Value = serde_json::from_str(&data)
        .map_err(|e| ClientError::Decode(format!("{}: {}", e, data)))?;

    if event.as_deref() == Some("error") || value.get("error").is_some() {
        let message = serde_json::from_value::<StreamErrorPayload>(value)
            .map(|p| p.error)
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Ok(StreamMessage::ServerError(message));
    }

    serde_json::from_value(value)
        .map(StreamMessage::Mood)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() {
        ClientError::Connect
    } else {
        ClientError::Request(e)
    }
}

fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status.as_u16()))
    }
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not connect to server")]
    Connect,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}
