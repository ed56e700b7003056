//! Profile endpoints
//!
//! Profiles are created lazily on first authenticated access.

use axum::{extract::State, Json};
use conclave_common::db::models::{Profile, TeeShirtSize};
use sqlx::SqlitePool;

use crate::api::auth::AuthUser;
use crate::error::ApiError;
use crate::forms::{parse_tee_shirt_size, profile_to_form, ProfileForm, ProfileMiniForm};
use crate::AppState;

/// Load the caller's profile, creating it from the identity on first access
pub async fn get_or_create_profile(pool: &SqlitePool, user: &AuthUser) -> Result<Profile, ApiError> {
    let existing = sqlx::query_as::<_, Profile>(
        "SELECT user_id, display_name, main_email, tee_shirt_size
         FROM profiles WHERE user_id = ?",
    )
    .bind(&user.user_id)
    .fetch_optional(pool)
    .await?;

    if let Some(profile) = existing {
        return Ok(profile);
    }

    let profile = Profile {
        user_id: user.user_id.clone(),
        display_name: user.nickname(),
        main_email: user.email.clone(),
        tee_shirt_size: TeeShirtSize::NotSpecified.as_str().to_string(),
    };

    // Concurrent first access may race; the existing row wins
    sqlx::query(
        "INSERT INTO profiles (user_id, display_name, main_email, tee_shirt_size)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(user_id) DO NOTHING",
    )
    .bind(&profile.user_id)
    .bind(&profile.display_name)
    .bind(&profile.main_email)
    .bind(&profile.tee_shirt_size)
    .execute(pool)
    .await?;

    Ok(profile)
}

/// GET /profile
///
/// Return the caller's profile, creating it if absent.
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileForm>, ApiError> {
    let profile = get_or_create_profile(&state.db, &user).await?;
    Ok(Json(profile_to_form(&profile)))
}

/// POST /profile
///
/// Update the caller's user-modifiable profile fields and return the result.
pub async fn save_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<ProfileMiniForm>,
) -> Result<Json<ProfileForm>, ApiError> {
    let mut profile = get_or_create_profile(&state.db, &user).await?;

    if let Some(display_name) = &form.display_name {
        if !display_name.trim().is_empty() {
            profile.display_name = display_name.clone();
        }
    }
    if let Some(raw) = &form.tee_shirt_size {
        if !raw.is_empty() {
            profile.tee_shirt_size = parse_tee_shirt_size(raw)?.as_str().to_string();
        }
    }

    sqlx::query("UPDATE profiles SET display_name = ?, tee_shirt_size = ? WHERE user_id = ?")
        .bind(&profile.display_name)
        .bind(&profile.tee_shirt_size)
        .bind(&profile.user_id)
        .execute(&state.db)
        .await?;

    Ok(Json(profile_to_form(&profile)))
}
