//! EmotiBot Relay HTTP API
//!
//! HTTP and Server-Sent Events layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Mood
//! - `GET /mood` - Current mood
//! - `PUT /mood` - Set the mood (`{"mood": "happy"}`)
//! - `GET /mood/stream` - SSE feed of mood changes
//!
//! ## Health
//! - `GET /` - Service status
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Health status with uptime
//!
//! # Example
//!
//! ```rust,no_run
//! use emotibot_relay::api::{serve, AppState};
//! use emotibot_relay::config::ServerConfig;
//! use emotibot_relay::store::{MoodStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MoodStore::new(StoreConfig::default())?);
//!     let state = AppState::new(store);
//!     serve(state, &ServerConfig::default()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let mood_routes = Router::new()
        .route("/", get(routes::mood::get_mood).put(routes::mood::update_mood))
        .route("/stream", get(routes::stream::stream_mood));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::health::root))
        .nest("/mood", mood_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Bind the configured address and start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    serve_on(listener, state).await
}

/// Start the API server on an already bound listener
///
/// Runs until a shutdown signal arrives or `state.shutdown` is cancelled.
/// Either way the token is cancelled so open streams end and graceful
/// shutdown can finish.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), ApiError> {
    let addr = listener.local_addr()?;
    let shutdown = state.shutdown.clone();
    let router = build_router(state);

    tracing::info!("EmotiBot relay listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_signal() => {},
                _ = shutdown.cancelled() => {},
            }
            shutdown.cancel();
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("EmotiBot relay shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MoodBackend, MoodStore, StoreConfig};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use futures_util::StreamExt;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<MoodStore>) {
        let store = Arc::new(MoodStore::new(StoreConfig::default()).unwrap());
        let backend: Arc<dyn MoodBackend> = store.clone();
        let router = build_router(AppState::new(backend));
        (router, store)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn put_mood(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/mood")
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_status() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "emotibot-relay");
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["streams"], 0);
    }

    #[tokio::test]
    async fn test_get_initial_mood() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/mood").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["mood"]["value"], "neutral");
        assert!(json["mood"]["timestamp"].as_f64().is_some());
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let (app, store) = create_test_app();

        let response = app
            .clone()
            .oneshot(put_mood(r#"{"mood": "productive"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["mood"]["value"], "productive");
        assert_eq!(store.get().value, "productive");

        let response = app
            .oneshot(Request::builder().uri("/mood").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let current = body_json(response).await;
        assert_eq!(current["mood"], updated["mood"]);
    }

    #[tokio::test]
    async fn test_update_empty_mood_rejected() {
        let (app, store) = create_test_app();

        let response = app.oneshot(put_mood(r#"{"mood": ""}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_MOOD");
        assert!(json["request_id"].is_string());
        assert_eq!(store.get().value, "neutral");
    }

    #[tokio::test]
    async fn test_update_invalid_json() {
        let (app, store) = create_test_app();

        let response = app.oneshot(put_mood("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.get().value, "neutral");
    }

    #[tokio::test]
    async fn test_stream_sends_snapshot_then_updates() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mood/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/event-stream"));
        assert_eq!(store.subscriber_count(), 1);

        let mut body = response.into_body().into_data_stream();

        let first = body.next().await.unwrap().unwrap();
        let first = String::from_utf8(first.to_vec()).unwrap();
        assert!(first.starts_with("data: "));
        assert!(first.contains(r#""value":"neutral""#));

        store.set("happy").unwrap();
        let second = body.next().await.unwrap().unwrap();
        let second = String::from_utf8(second.to_vec()).unwrap();
        assert!(second.contains(r#""value":"happy""#));

        drop(body);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_refused_at_subscriber_limit() {
        let config = StoreConfig {
            max_subscribers: 1,
            ..Default::default()
        };
        let store = Arc::new(MoodStore::new(config).unwrap());
        let _held = store.subscribe().unwrap();
        let app = build_router(AppState::new(store));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mood/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_stream_sends_keep_alive_comment() {
        let store = Arc::new(MoodStore::new(StoreConfig::default()).unwrap());
        let app = build_router(AppState::with_heartbeat(
            store.clone(),
            std::time::Duration::from_secs(15),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mood/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let mut body = response.into_body().into_data_stream();

        let snapshot = body.next().await.unwrap().unwrap();
        assert!(snapshot.starts_with(b"data: "));
        assert!(snapshot.ends_with(b"\n\n"));

        let keep_alive = body.next().await.unwrap().unwrap();
        assert_eq!(&keep_alive[..], b": keep-alive\n\n");

        store.set("happy").unwrap();
        let update = body.next().await.unwrap().unwrap();
        assert!(update.starts_with(b"data: "));
    }
}
