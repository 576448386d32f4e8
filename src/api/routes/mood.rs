//! Mood Routes
//!
//! - GET /mood - Current mood
//! - PUT /mood - Replace the mood and notify every stream

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{MoodResponse, MoodUpdateRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /mood
pub async fn get_mood(State(state): State<Arc<AppState>>) -> Json<MoodResponse> {
    Json(MoodResponse {
        mood: state.store.get(),
    })
}

/// PUT /mood
///
/// An invalid label is rejected with 400 and the stored mood is unchanged.
pub async fn update_mood(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoodUpdateRequest>,
) -> ApiResult<Json<MoodResponse>> {
    let mood = state.store.set(req.mood)?;
    Ok(Json(MoodResponse { mood }))
}
