//! Session endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use conclave_common::db::models::{Session, SessionType};
use serde::Serialize;
use tracing::info;

use crate::api::auth::AuthUser;
use crate::api::conferences::conference_by_key;
use crate::error::ApiError;
use crate::forms::{new_session, session_to_form, SessionForm};
use crate::jobs::Job;
use crate::AppState;

/// A list of session representations
#[derive(Debug, Serialize)]
pub struct SessionForms {
    pub items: Vec<SessionForm>,
}

const SESSION_COLUMNS: &str =
    "id, conference_id, name, highlights, speaker, duration, \
     type_of_session, date_time, start_time, created_at";

fn to_forms(sessions: Vec<Session>) -> SessionForms {
    SessionForms {
        items: sessions.iter().map(session_to_form).collect(),
    }
}

/// POST /conference/{key}/sessions
///
/// Create a session under a conference; organizer only. When the speaker
/// ends up with more than one session in the conference, a featured-speaker
/// job is enqueued (best-effort).
pub async fn create_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(form): Json<SessionForm>,
) -> Result<Json<SessionForm>, ApiError> {
    // Name is validated before the conference is even looked up
    if form.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        return Err(ApiError::BadRequest(
            "You must input a Session name".to_string(),
        ));
    }

    let conference = conference_by_key(&state.db, &key).await?;
    if conference.organizer_user_id != user.user_id {
        return Err(ApiError::Forbidden(
            "You must be the conference owner to create a session".to_string(),
        ));
    }

    let session = new_session(&form, &conference.id)?;

    sqlx::query(
        "INSERT INTO sessions
         (id, conference_id, name, highlights, speaker, duration,
          type_of_session, date_time, start_time, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&session.id)
    .bind(&session.conference_id)
    .bind(&session.name)
    .bind(&session.highlights)
    .bind(&session.speaker)
    .bind(session.duration)
    .bind(&session.type_of_session)
    .bind(&session.date_time)
    .bind(&session.start_time)
    .bind(&session.created_at)
    .execute(&state.db)
    .await?;

    info!("Session created: {} in {}", session.name, conference.name);

    let speaker_sessions: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sessions WHERE conference_id = ? AND speaker = ?",
    )
    .bind(&session.conference_id)
    .bind(&session.speaker)
    .fetch_one(&state.db)
    .await?;

    if speaker_sessions > 1 {
        state.jobs.enqueue(Job::FeaturedSpeaker {
            conference_id: session.conference_id.clone(),
            speaker: session.speaker.clone(),
        });
    }

    Ok(Json(session_to_form(&session)))
}

/// GET /sessions
pub async fn get_sessions(State(state): State<AppState>) -> Result<Json<SessionForms>, ApiError> {
    let sessions = sqlx::query_as::<_, Session>(&format!(
        "SELECT {} FROM sessions ORDER BY created_at",
        SESSION_COLUMNS
    ))
    .fetch_all(&state.db)
    .await?;
    Ok(Json(to_forms(sessions)))
}

/// GET /conference/{key}/sessions
pub async fn conference_sessions(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SessionForms>, ApiError> {
    let conference = conference_by_key(&state.db, &key).await?;
    let sessions = sqlx::query_as::<_, Session>(&format!(
        "SELECT {} FROM sessions WHERE conference_id = ? ORDER BY created_at",
        SESSION_COLUMNS
    ))
    .bind(&conference.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(to_forms(sessions)))
}

/// GET /conference/{key}/sessions/{type}
pub async fn conference_sessions_by_type(
    State(state): State<AppState>,
    Path((key, type_of_session)): Path<(String, String)>,
) -> Result<Json<SessionForms>, ApiError> {
    let session_type = type_of_session
        .parse::<SessionType>()
        .map_err(ApiError::BadRequest)?;

    let conference = conference_by_key(&state.db, &key).await?;
    let sessions = sqlx::query_as::<_, Session>(&format!(
        "SELECT {} FROM sessions
         WHERE conference_id = ? AND type_of_session = ?
         ORDER BY created_at",
        SESSION_COLUMNS
    ))
    .bind(&conference.id)
    .bind(session_type.as_str())
    .fetch_all(&state.db)
    .await?;
    Ok(Json(to_forms(sessions)))
}

/// GET /sessions/speaker/{speaker}
pub async fn sessions_by_speaker(
    State(state): State<AppState>,
    Path(speaker): Path<String>,
) -> Result<Json<SessionForms>, ApiError> {
    let sessions = sqlx::query_as::<_, Session>(&format!(
        "SELECT {} FROM sessions WHERE speaker = ? ORDER BY created_at",
        SESSION_COLUMNS
    ))
    .bind(&speaker)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(to_forms(sessions)))
}
