//! Health Routes
//!
//! Liveness endpoints. They never touch the mood store.
//!
//! - GET / - Service status
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Health status with uptime and open stream count

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{HealthResponse, ServiceStatus};
use crate::api::state::AppState;

/// GET /
pub async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok".to_string(),
        service: "emotibot-relay".to_string(),
    })
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        streams: state.stream_count(),
    })
}
