//! HTTP API handlers for conclave-api

pub mod announcements;
pub mod auth;
pub mod conferences;
pub mod health;
pub mod profile;
pub mod registration;
pub mod sessions;

pub use announcements::{get_announcement, get_featured_speaker};
pub use auth::AuthUser;
pub use conferences::{
    conferences_attending, conferences_created, conferences_low_seats, conferences_with_workshop,
    create_conference, get_conference, query_conferences, update_conference,
};
pub use health::health_routes;
pub use profile::{get_profile, save_profile};
pub use registration::{
    add_session_to_wishlist, get_wishlist, register_for_conference,
    remove_session_from_wishlist, unregister_from_conference,
};
pub use sessions::{
    conference_sessions, conference_sessions_by_type, create_session, get_sessions,
    sessions_by_speaker,
};
