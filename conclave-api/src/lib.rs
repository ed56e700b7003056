//! conclave-api library - conference management service
//!
//! RPC-style HTTP endpoints for creating conferences and sessions, managing
//! profiles, registering attendance, maintaining a session wishlist and
//! serving cached announcements.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cache;
pub mod error;
pub mod forms;
pub mod jobs;
pub mod query;

use cache::Cache;
use jobs::JobQueue;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Announcement / featured-speaker cache
    pub cache: Cache,
    /// Background job queue
    pub jobs: JobQueue,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, cache: Cache, jobs: JobQueue) -> Self {
        Self { db, cache, jobs }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        // Conferences
        .route("/conference", post(api::create_conference))
        .route(
            "/conference/:key",
            get(api::get_conference).put(api::update_conference),
        )
        .route("/conferences/query", post(api::query_conferences))
        .route("/conferences/created", post(api::conferences_created))
        .route("/conferences/attending", get(api::conferences_attending))
        .route("/conferences/low-seats", post(api::conferences_low_seats))
        .route(
            "/conferences/with-workshop",
            post(api::conferences_with_workshop),
        )
        // Sessions
        .route(
            "/conference/:key/sessions",
            post(api::create_session).get(api::conference_sessions),
        )
        .route(
            "/conference/:key/sessions/:type",
            get(api::conference_sessions_by_type),
        )
        .route("/sessions", get(api::get_sessions))
        .route("/sessions/speaker/:speaker", get(api::sessions_by_speaker))
        // Registration
        .route(
            "/conference/:key/registration",
            post(api::register_for_conference).delete(api::unregister_from_conference),
        )
        // Wishlist
        .route("/wishlist", get(api::get_wishlist))
        .route(
            "/wishlist/:session_key",
            post(api::add_session_to_wishlist).delete(api::remove_session_from_wishlist),
        )
        // Profile
        .route("/profile", get(api::get_profile).post(api::save_profile))
        // Announcements
        .route("/announcement", get(api::get_announcement))
        .route("/featured-speaker", get(api::get_featured_speaker))
        // Health
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
