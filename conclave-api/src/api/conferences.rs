//! Conference endpoints: create, get, update, and the query surfaces

use axum::{
    extract::{Path, State},
    Json,
};
use conclave_common::db::models::{Conference, SessionType};
use conclave_common::db::{with_transaction, TX_MAX_RETRIES};
use conclave_common::token::{decode_key, KeyKind};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::info;

use crate::api::auth::AuthUser;
use crate::api::profile::get_or_create_profile;
use crate::error::ApiError;
use crate::forms::{apply_conference_update, conference_to_form, new_conference, ConferenceForm};
use crate::jobs::Job;
use crate::query::{ConferenceFilter, QueryPlan};
use crate::AppState;

/// A list of conference representations
#[derive(Debug, Serialize)]
pub struct ConferenceForms {
    pub items: Vec<ConferenceForm>,
}

/// Query request: an ordered batch of field/operator/value filters
#[derive(Debug, Deserialize)]
pub struct ConferenceQueryForm {
    #[serde(default)]
    pub filters: Vec<ConferenceFilter>,
}

const CONFERENCE_COLUMNS: &str =
    "id, organizer_user_id, name, description, city, topics, \
     start_date, end_date, month, max_attendees, seats_available, created_at";

/// Fetch a conference row by its opaque key token
pub async fn conference_by_key(pool: &SqlitePool, token: &str) -> Result<Conference, ApiError> {
    let id = decode_key(token, KeyKind::Conference)?;
    let conference = sqlx::query_as::<_, Conference>(&format!(
        "SELECT {} FROM conferences WHERE id = ?",
        CONFERENCE_COLUMNS
    ))
    .bind(&id)
    .fetch_optional(pool)
    .await?;

    conference.ok_or_else(|| ApiError::NotFound(format!("No conference found with key: {}", token)))
}

/// Resolve organizer display names for a conference list (multi-get)
async fn organizer_names(
    pool: &SqlitePool,
    conferences: &[Conference],
) -> Result<HashMap<String, String>, ApiError> {
    let mut ids: Vec<&str> = conferences
        .iter()
        .map(|c| c.organizer_user_id.as_str())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT user_id, display_name FROM profiles WHERE user_id IN ({})",
        placeholders
    );
    let mut query = sqlx::query_as::<_, (String, String)>(&sql);
    for id in &ids {
        query = query.bind(*id);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

fn to_forms(conferences: Vec<Conference>, names: &HashMap<String, String>) -> ConferenceForms {
    ConferenceForms {
        items: conferences
            .iter()
            .map(|c| conference_to_form(c, names.get(&c.organizer_user_id).cloned()))
            .collect(),
    }
}

/// POST /conference
///
/// Create a new conference owned by the caller. Enqueues a best-effort
/// confirmation email.
pub async fn create_conference(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<ConferenceForm>,
) -> Result<Json<ConferenceForm>, ApiError> {
    let profile = get_or_create_profile(&state.db, &user).await?;
    let conference = new_conference(&form, &user.user_id)?;

    sqlx::query(
        "INSERT INTO conferences
         (id, organizer_user_id, name, description, city, topics,
          start_date, end_date, month, max_attendees, seats_available, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&conference.id)
    .bind(&conference.organizer_user_id)
    .bind(&conference.name)
    .bind(&conference.description)
    .bind(&conference.city)
    .bind(conference.topics.clone())
    .bind(&conference.start_date)
    .bind(&conference.end_date)
    .bind(conference.month)
    .bind(conference.max_attendees)
    .bind(conference.seats_available)
    .bind(&conference.created_at)
    .execute(&state.db)
    .await?;

    info!("Conference created: {} ({})", conference.name, conference.id);

    state.jobs.enqueue(Job::ConfirmationEmail {
        email: user.email.clone(),
        conference_info: conference.name.clone(),
    });

    Ok(Json(conference_to_form(
        &conference,
        Some(profile.display_name),
    )))
}

/// GET /conference/{key}
pub async fn get_conference(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ConferenceForm>, ApiError> {
    let conference = conference_by_key(&state.db, &key).await?;
    let display_name: Option<String> =
        sqlx::query_scalar("SELECT display_name FROM profiles WHERE user_id = ?")
            .bind(&conference.organizer_user_id)
            .fetch_optional(&state.db)
            .await?;

    Ok(Json(conference_to_form(&conference, display_name)))
}

/// Outcome of the transactional conference update
enum UpdateOutcome {
    Updated(Box<Conference>),
    Missing,
    NotOwner,
    Invalid(String),
}

/// PUT /conference/{key}
///
/// Copy provided fields onto the conference; organizer only. The
/// read-modify-write runs as a single transaction.
pub async fn update_conference(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(form): Json<ConferenceForm>,
) -> Result<Json<ConferenceForm>, ApiError> {
    let id = decode_key(&key, KeyKind::Conference)?;

    let outcome = with_transaction(&state.db, TX_MAX_RETRIES, |conn| {
        let id = id.clone();
        let form = form.clone();
        let user_id = user.user_id.clone();
        Box::pin(async move {
            let conference = sqlx::query_as::<_, Conference>(&format!(
                "SELECT {} FROM conferences WHERE id = ?",
                CONFERENCE_COLUMNS
            ))
            .bind(&id)
            .fetch_optional(&mut *conn)
            .await?;

            let Some(mut conference) = conference else {
                return Ok(UpdateOutcome::Missing);
            };
            if conference.organizer_user_id != user_id {
                return Ok(UpdateOutcome::NotOwner);
            }

            if let Err(err) = apply_conference_update(&mut conference, &form) {
                return Ok(UpdateOutcome::Invalid(err.to_string()));
            }

            sqlx::query(
                "UPDATE conferences SET
                 name = ?, description = ?, city = ?, topics = ?,
                 start_date = ?, end_date = ?, month = ?,
                 max_attendees = ?, seats_available = ?
                 WHERE id = ?",
            )
            .bind(&conference.name)
            .bind(&conference.description)
            .bind(&conference.city)
            .bind(conference.topics.clone())
            .bind(&conference.start_date)
            .bind(&conference.end_date)
            .bind(conference.month)
            .bind(conference.max_attendees)
            .bind(conference.seats_available)
            .bind(&conference.id)
            .execute(&mut *conn)
            .await?;

            Ok(UpdateOutcome::Updated(Box::new(conference)))
        })
    })
    .await?;

    match outcome {
        UpdateOutcome::Updated(conference) => {
            let display_name: Option<String> =
                sqlx::query_scalar("SELECT display_name FROM profiles WHERE user_id = ?")
                    .bind(&user.user_id)
                    .fetch_optional(&state.db)
                    .await?;
            Ok(Json(conference_to_form(&conference, display_name)))
        }
        UpdateOutcome::Missing => Err(ApiError::NotFound(format!(
            "No conference found with key: {}",
            key
        ))),
        UpdateOutcome::NotOwner => Err(ApiError::Forbidden(
            "Only the owner can update the conference".to_string(),
        )),
        UpdateOutcome::Invalid(msg) => Err(ApiError::BadRequest(msg)),
    }
}

/// POST /conferences/query
///
/// Validate the filter batch, build the query plan and execute it.
pub async fn query_conferences(
    State(state): State<AppState>,
    Json(form): Json<ConferenceQueryForm>,
) -> Result<Json<ConferenceForms>, ApiError> {
    let plan = QueryPlan::build(&form.filters)?;
    let conferences = plan.fetch(&state.db).await?;
    let names = organizer_names(&state.db, &conferences).await?;
    Ok(Json(to_forms(conferences, &names)))
}

/// POST /conferences/created
///
/// Conferences organized by the caller.
pub async fn conferences_created(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ConferenceForms>, ApiError> {
    let profile = get_or_create_profile(&state.db, &user).await?;
    let conferences = sqlx::query_as::<_, Conference>(&format!(
        "SELECT {} FROM conferences WHERE organizer_user_id = ? ORDER BY name",
        CONFERENCE_COLUMNS
    ))
    .bind(&user.user_id)
    .fetch_all(&state.db)
    .await?;

    let names: HashMap<String, String> =
        HashMap::from([(user.user_id.clone(), profile.display_name)]);
    Ok(Json(to_forms(conferences, &names)))
}

/// GET /conferences/attending
///
/// Conferences the caller has registered for.
pub async fn conferences_attending(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ConferenceForms>, ApiError> {
    get_or_create_profile(&state.db, &user).await?;
    let conferences = sqlx::query_as::<_, Conference>(&format!(
        "SELECT {} FROM conferences c
         JOIN attendance a ON c.id = a.conference_id
         WHERE a.user_id = ?
         ORDER BY c.name",
        CONFERENCE_COLUMNS
    ))
    .bind(&user.user_id)
    .fetch_all(&state.db)
    .await?;

    let names = organizer_names(&state.db, &conferences).await?;
    Ok(Json(to_forms(conferences, &names)))
}

/// POST /conferences/low-seats
///
/// Conferences with fewer than five seats left. Deliberately a full scan
/// with an in-memory check rather than a filter-engine query.
pub async fn conferences_low_seats(
    State(state): State<AppState>,
) -> Result<Json<ConferenceForms>, ApiError> {
    let conferences = sqlx::query_as::<_, Conference>(&format!(
        "SELECT {} FROM conferences",
        CONFERENCE_COLUMNS
    ))
    .fetch_all(&state.db)
    .await?;

    let low_seats: Vec<Conference> = conferences
        .into_iter()
        .filter(|c| c.seats_available < 5)
        .collect();

    let names = organizer_names(&state.db, &low_seats).await?;
    Ok(Json(to_forms(low_seats, &names)))
}

/// POST /conferences/with-workshop
///
/// Conferences that have at least one workshop session. Scan-based
/// membership check over each conference's sessions.
pub async fn conferences_with_workshop(
    State(state): State<AppState>,
) -> Result<Json<ConferenceForms>, ApiError> {
    let conferences = sqlx::query_as::<_, Conference>(&format!(
        "SELECT {} FROM conferences",
        CONFERENCE_COLUMNS
    ))
    .fetch_all(&state.db)
    .await?;

    let mut with_workshop = Vec::new();
    for conference in conferences {
        let session_types: Vec<String> =
            sqlx::query_scalar("SELECT type_of_session FROM sessions WHERE conference_id = ?")
                .bind(&conference.id)
                .fetch_all(&state.db)
                .await?;
        if session_types
            .iter()
            .any(|t| t == SessionType::Workshop.as_str())
        {
            with_workshop.push(conference);
        }
    }

    let names = organizer_names(&state.db, &with_workshop).await?;
    Ok(Json(to_forms(with_workshop, &names)))
}
