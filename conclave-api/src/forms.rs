//! Wire-level forms and form/entity mapping
//!
//! Statically-typed mapping between client-facing forms and storage rows:
//! default injection for omitted fields, date parsing, enumeration
//! translation and opaque key attachment.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use conclave_common::db::models::{Conference, Profile, Session, SessionType, TeeShirtSize};
use conclave_common::token::{encode_key, KeyKind};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::ApiError;

// Defaults injected for omitted conference fields
const DEFAULT_CITY: &str = "Default City";
const DEFAULT_TOPICS: [&str; 2] = ["Default", "Topic"];

// Defaults injected for omitted session fields
const DEFAULT_SPEAKER: &str = "Unknown";
const DEFAULT_DURATION: i64 = 60;

/// Conference wire form (inbound and outbound)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConferenceForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub topics: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub month: Option<i64>,
    pub max_attendees: Option<i64>,
    pub seats_available: Option<i64>,
    pub organizer_user_id: Option<String>,
    pub organizer_display_name: Option<String>,
    pub websafe_key: Option<String>,
}

/// Session wire form (inbound and outbound)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionForm {
    pub name: Option<String>,
    pub highlights: Option<String>,
    pub speaker: Option<String>,
    pub duration: Option<i64>,
    pub type_of_session: Option<String>,
    pub date_time: Option<String>,
    pub start_time: Option<String>,
    pub websafe_key: Option<String>,
}

/// Profile wire form (outbound)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: String,
}

/// User-modifiable profile fields (inbound)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileMiniForm {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<String>,
}

/// Parse a calendar date, tolerating a trailing time component
/// (only the leading `YYYY-MM-DD` is considered)
fn parse_date_prefix(value: &str) -> Result<NaiveDate, ApiError> {
    let prefix = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Malformed date (want YYYY-MM-DD): {}", value)))
}

/// Parse a session date+time in `YYYY-MM-DD HH:MM` form
fn parse_date_time(value: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").map_err(|_| {
        ApiError::BadRequest(format!(
            "Malformed date/time (want YYYY-MM-DD HH:MM): {}",
            value
        ))
    })
}

/// Build a new conference row from a create request, injecting defaults
/// and deriving month and available seats
pub fn new_conference(form: &ConferenceForm, organizer_user_id: &str) -> Result<Conference, ApiError> {
    let name = match &form.name {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => return Err(ApiError::BadRequest("Conference 'name' field required".to_string())),
    };

    let city = match &form.city {
        Some(city) if !city.is_empty() => city.clone(),
        _ => DEFAULT_CITY.to_string(),
    };
    let topics = match &form.topics {
        Some(topics) if !topics.is_empty() => topics.clone(),
        _ => DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
    };

    // month derives from the start date; 0 when no start date given
    let (start_date, month) = match &form.start_date {
        Some(raw) => {
            let date = parse_date_prefix(raw)?;
            (Some(date.to_string()), i64::from(date.month()))
        }
        None => (None, 0),
    };
    let end_date = match &form.end_date {
        Some(raw) => Some(parse_date_prefix(raw)?.to_string()),
        None => None,
    };

    let max_attendees = form.max_attendees.unwrap_or(0);
    if max_attendees < 0 {
        return Err(ApiError::BadRequest("maxAttendees must not be negative".to_string()));
    }
    // seats open at capacity
    let seats_available = if max_attendees > 0 { max_attendees } else { 0 };

    Ok(Conference {
        id: Uuid::new_v4().to_string(),
        organizer_user_id: organizer_user_id.to_string(),
        name,
        description: form.description.clone(),
        city,
        topics: Json(topics),
        start_date,
        end_date,
        month,
        max_attendees,
        seats_available,
        created_at: Utc::now().to_rfc3339(),
    })
}

/// Copy provided fields from an update request onto an existing conference.
/// Omitted fields are left untouched; a new start date re-derives month.
pub fn apply_conference_update(
    conference: &mut Conference,
    form: &ConferenceForm,
) -> Result<(), ApiError> {
    if let Some(name) = &form.name {
        if !name.trim().is_empty() {
            conference.name = name.clone();
        }
    }
    if let Some(description) = &form.description {
        conference.description = Some(description.clone());
    }
    if let Some(city) = &form.city {
        if !city.is_empty() {
            conference.city = city.clone();
        }
    }
    if let Some(topics) = &form.topics {
        if !topics.is_empty() {
            conference.topics = Json(topics.clone());
        }
    }
    if let Some(raw) = &form.start_date {
        let date = parse_date_prefix(raw)?;
        conference.start_date = Some(date.to_string());
        conference.month = i64::from(date.month());
    }
    if let Some(raw) = &form.end_date {
        conference.end_date = Some(parse_date_prefix(raw)?.to_string());
    }
    if let Some(max_attendees) = form.max_attendees {
        if max_attendees < 0 {
            return Err(ApiError::BadRequest("maxAttendees must not be negative".to_string()));
        }
        conference.max_attendees = max_attendees;
    }
    if let Some(seats_available) = form.seats_available {
        if seats_available < 0 {
            return Err(ApiError::BadRequest("seatsAvailable must not be negative".to_string()));
        }
        conference.seats_available = seats_available;
    }
    Ok(())
}

/// Serialize a conference row to its wire form
pub fn conference_to_form(conference: &Conference, organizer_display_name: Option<String>) -> ConferenceForm {
    ConferenceForm {
        name: Some(conference.name.clone()),
        description: conference.description.clone(),
        city: Some(conference.city.clone()),
        topics: Some(conference.topics.0.clone()),
        start_date: conference.start_date.clone(),
        end_date: conference.end_date.clone(),
        month: Some(conference.month),
        max_attendees: Some(conference.max_attendees),
        seats_available: Some(conference.seats_available),
        organizer_user_id: Some(conference.organizer_user_id.clone()),
        organizer_display_name,
        websafe_key: Some(encode_key(KeyKind::Conference, &conference.id)),
    }
}

/// Build a new session row from a create request, injecting defaults
/// and deriving the display start time
pub fn new_session(form: &SessionForm, conference_id: &str) -> Result<Session, ApiError> {
    let name = match &form.name {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => return Err(ApiError::BadRequest("You must input a Session name".to_string())),
    };

    let speaker = match &form.speaker {
        Some(speaker) if !speaker.is_empty() => speaker.clone(),
        _ => DEFAULT_SPEAKER.to_string(),
    };
    let duration = form.duration.unwrap_or(DEFAULT_DURATION);
    if duration <= 0 {
        return Err(ApiError::BadRequest("Session duration must be positive".to_string()));
    }

    let type_of_session = match &form.type_of_session {
        Some(raw) if !raw.is_empty() => raw
            .parse::<SessionType>()
            .map_err(ApiError::BadRequest)?,
        _ => SessionType::Lecture,
    };

    let (date_time, start_time) = match &form.date_time {
        Some(raw) => {
            let parsed = parse_date_time(raw)?;
            (
                Some(parsed.format("%Y-%m-%d %H:%M").to_string()),
                Some(parsed.format("%H:%M").to_string()),
            )
        }
        None => (None, None),
    };

    Ok(Session {
        id: Uuid::new_v4().to_string(),
        conference_id: conference_id.to_string(),
        name,
        highlights: form.highlights.clone(),
        speaker,
        duration,
        type_of_session: type_of_session.as_str().to_string(),
        date_time,
        start_time,
        created_at: Utc::now().to_rfc3339(),
    })
}

/// Serialize a session row to its wire form
pub fn session_to_form(session: &Session) -> SessionForm {
    SessionForm {
        name: Some(session.name.clone()),
        highlights: session.highlights.clone(),
        speaker: Some(session.speaker.clone()),
        duration: Some(session.duration),
        type_of_session: Some(session.type_of_session.clone()),
        date_time: session.date_time.clone(),
        start_time: session.start_time.clone(),
        websafe_key: Some(encode_key(KeyKind::Session, &session.id)),
    }
}

/// Serialize a profile row to its wire form
pub fn profile_to_form(profile: &Profile) -> ProfileForm {
    ProfileForm {
        display_name: profile.display_name.clone(),
        main_email: profile.main_email.clone(),
        tee_shirt_size: profile.tee_shirt_size.clone(),
    }
}

/// Validate a tee shirt size token from a profile edit
pub fn parse_tee_shirt_size(raw: &str) -> Result<TeeShirtSize, ApiError> {
    raw.parse::<TeeShirtSize>().map_err(ApiError::BadRequest)
}
