//! Registration and wishlist toggles
//!
//! Two instances of the same membership state machine over a profile:
//! conference attendance (with a paired seat counter) and the session
//! wishlist. Each toggle runs as one atomic transaction.

use axum::{
    extract::{Path, State},
    Json,
};
use conclave_common::db::models::Session;
use conclave_common::db::{with_transaction, TX_MAX_RETRIES};
use conclave_common::token::{decode_key, KeyKind};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::api::auth::AuthUser;
use crate::api::profile::get_or_create_profile;
use crate::api::sessions::SessionForms;
use crate::error::ApiError;
use crate::forms::session_to_form;
use crate::AppState;

/// Boolean RPC result wrapper
#[derive(Debug, Serialize)]
pub struct BooleanMessage {
    pub data: bool,
}

/// Registration state-machine outcomes, resolved inside the transaction
enum RegistrationOutcome {
    Registered,
    AlreadyRegistered,
    NoSeats,
    ConferenceMissing,
    Unregistered,
    NotRegistered,
}

async fn membership_exists(
    conn: &mut SqliteConnection,
    sql: &str,
    user_id: &str,
    target_id: &str,
) -> conclave_common::Result<bool> {
    let count: i64 = sqlx::query_scalar(sql)
        .bind(user_id)
        .bind(target_id)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

/// Toggle conference attendance for a user. Membership mutation and seat
/// counter adjustment commit or roll back as a unit.
async fn toggle_registration(
    pool: &SqlitePool,
    user_id: &str,
    conference_id: &str,
    register: bool,
) -> Result<RegistrationOutcome, ApiError> {
    let outcome = with_transaction(pool, TX_MAX_RETRIES, |conn| {
        let user_id = user_id.to_string();
        let conference_id = conference_id.to_string();
        Box::pin(async move {
            let seats: Option<i64> =
                sqlx::query_scalar("SELECT seats_available FROM conferences WHERE id = ?")
                    .bind(&conference_id)
                    .fetch_optional(&mut *conn)
                    .await?;
            let Some(seats) = seats else {
                return Ok(RegistrationOutcome::ConferenceMissing);
            };

            let registered = membership_exists(
                conn,
                "SELECT COUNT(*) FROM attendance WHERE user_id = ? AND conference_id = ?",
                &user_id,
                &conference_id,
            )
            .await?;

            if register {
                if registered {
                    return Ok(RegistrationOutcome::AlreadyRegistered);
                }
                if seats <= 0 {
                    return Ok(RegistrationOutcome::NoSeats);
                }

                sqlx::query("INSERT INTO attendance (user_id, conference_id) VALUES (?, ?)")
                    .bind(&user_id)
                    .bind(&conference_id)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query(
                    "UPDATE conferences SET seats_available = seats_available - 1 WHERE id = ?",
                )
                .bind(&conference_id)
                .execute(&mut *conn)
                .await?;
                Ok(RegistrationOutcome::Registered)
            } else if registered {
                sqlx::query("DELETE FROM attendance WHERE user_id = ? AND conference_id = ?")
                    .bind(&user_id)
                    .bind(&conference_id)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query(
                    "UPDATE conferences SET seats_available = seats_available + 1 WHERE id = ?",
                )
                .bind(&conference_id)
                .execute(&mut *conn)
                .await?;
                Ok(RegistrationOutcome::Unregistered)
            } else {
                Ok(RegistrationOutcome::NotRegistered)
            }
        })
    })
    .await?;

    Ok(outcome)
}

/// POST /conference/{key}/registration
pub async fn register_for_conference(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    get_or_create_profile(&state.db, &user).await?;
    let conference_id = decode_key(&key, KeyKind::Conference)?;

    match toggle_registration(&state.db, &user.user_id, &conference_id, true).await? {
        RegistrationOutcome::Registered => Ok(Json(BooleanMessage { data: true })),
        RegistrationOutcome::AlreadyRegistered => Err(ApiError::Conflict(
            "You have already registered for this conference".to_string(),
        )),
        RegistrationOutcome::NoSeats => Err(ApiError::Conflict(
            "There are no seats available".to_string(),
        )),
        RegistrationOutcome::ConferenceMissing => Err(ApiError::NotFound(format!(
            "No conference found with key: {}",
            key
        ))),
        _ => Err(ApiError::Internal("Unexpected registration state".to_string())),
    }
}

/// DELETE /conference/{key}/registration
///
/// Unregistering while not registered reports false rather than failing.
pub async fn unregister_from_conference(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    get_or_create_profile(&state.db, &user).await?;
    let conference_id = decode_key(&key, KeyKind::Conference)?;

    match toggle_registration(&state.db, &user.user_id, &conference_id, false).await? {
        RegistrationOutcome::Unregistered => Ok(Json(BooleanMessage { data: true })),
        RegistrationOutcome::NotRegistered => Ok(Json(BooleanMessage { data: false })),
        RegistrationOutcome::ConferenceMissing => Err(ApiError::NotFound(format!(
            "No conference found with key: {}",
            key
        ))),
        _ => Err(ApiError::Internal("Unexpected registration state".to_string())),
    }
}

/// Wishlist state-machine outcomes
enum WishlistOutcome {
    Added,
    AlreadyWishlisted,
    SessionMissing,
    Removed,
    NotWishlisted,
}

async fn toggle_wishlist(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
    add: bool,
) -> Result<WishlistOutcome, ApiError> {
    let outcome = with_transaction(pool, TX_MAX_RETRIES, |conn| {
        let user_id = user_id.to_string();
        let session_id = session_id.to_string();
        Box::pin(async move {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE id = ?")
                .bind(&session_id)
                .fetch_one(&mut *conn)
                .await?;
            if exists == 0 {
                return Ok(WishlistOutcome::SessionMissing);
            }

            let wishlisted = membership_exists(
                conn,
                "SELECT COUNT(*) FROM wishlist WHERE user_id = ? AND session_id = ?",
                &user_id,
                &session_id,
            )
            .await?;

            if add {
                if wishlisted {
                    return Ok(WishlistOutcome::AlreadyWishlisted);
                }
                sqlx::query("INSERT INTO wishlist (user_id, session_id) VALUES (?, ?)")
                    .bind(&user_id)
                    .bind(&session_id)
                    .execute(&mut *conn)
                    .await?;
                Ok(WishlistOutcome::Added)
            } else if wishlisted {
                sqlx::query("DELETE FROM wishlist WHERE user_id = ? AND session_id = ?")
                    .bind(&user_id)
                    .bind(&session_id)
                    .execute(&mut *conn)
                    .await?;
                Ok(WishlistOutcome::Removed)
            } else {
                Ok(WishlistOutcome::NotWishlisted)
            }
        })
    })
    .await?;

    Ok(outcome)
}

/// POST /wishlist/{session_key}
pub async fn add_session_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    get_or_create_profile(&state.db, &user).await?;
    let session_id = decode_key(&key, KeyKind::Session)?;

    match toggle_wishlist(&state.db, &user.user_id, &session_id, true).await? {
        WishlistOutcome::Added => Ok(Json(BooleanMessage { data: true })),
        WishlistOutcome::AlreadyWishlisted => Err(ApiError::Conflict(
            "This session is already in your wishlist".to_string(),
        )),
        WishlistOutcome::SessionMissing => Err(ApiError::NotFound(format!(
            "No session found with key: {}",
            key
        ))),
        _ => Err(ApiError::Internal("Unexpected wishlist state".to_string())),
    }
}

/// DELETE /wishlist/{session_key}
pub async fn remove_session_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    get_or_create_profile(&state.db, &user).await?;
    let session_id = decode_key(&key, KeyKind::Session)?;

    match toggle_wishlist(&state.db, &user.user_id, &session_id, false).await? {
        WishlistOutcome::Removed => Ok(Json(BooleanMessage { data: true })),
        WishlistOutcome::NotWishlisted => Ok(Json(BooleanMessage { data: false })),
        WishlistOutcome::SessionMissing => Err(ApiError::NotFound(format!(
            "No session found with key: {}",
            key
        ))),
        _ => Err(ApiError::Internal("Unexpected wishlist state".to_string())),
    }
}

/// GET /wishlist
pub async fn get_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SessionForms>, ApiError> {
    get_or_create_profile(&state.db, &user).await?;
    let sessions = sqlx::query_as::<_, Session>(
        "SELECT s.id, s.conference_id, s.name, s.highlights, s.speaker, s.duration,
                s.type_of_session, s.date_time, s.start_time, s.created_at
         FROM sessions s
         JOIN wishlist w ON s.id = w.session_id
         WHERE w.user_id = ?
         ORDER BY s.created_at",
    )
    .bind(&user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(SessionForms {
        items: sessions.iter().map(session_to_form).collect(),
    }))
}
