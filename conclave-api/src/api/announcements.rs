//! Cached announcement and featured-speaker endpoints
//!
//! Read path only: absent cache entries read as an empty string and never
//! block on population.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::cache::{ANNOUNCEMENTS_KEY, FEATURED_SPEAKER_KEY};
use crate::AppState;

/// String RPC result wrapper
#[derive(Debug, Serialize)]
pub struct StringMessage {
    pub data: String,
}

/// GET /announcement
pub async fn get_announcement(State(state): State<AppState>) -> Json<StringMessage> {
    Json(StringMessage {
        data: state.cache.get(ANNOUNCEMENTS_KEY).unwrap_or_default(),
    })
}

/// GET /featured-speaker
pub async fn get_featured_speaker(State(state): State<AppState>) -> Json<StringMessage> {
    Json(StringMessage {
        data: state.cache.get(FEATURED_SPEAKER_KEY).unwrap_or_default(),
    })
}
