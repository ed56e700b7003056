//! Authenticated identity extraction
//!
//! Authentication itself is delegated to a fronting identity provider
//! which injects the verified identity as request headers. Handlers that
//! require a user take `AuthUser` as an extractor; anonymous requests are
//! rejected with 401 before the handler runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header carrying the verified user identity
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the verified user email
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated caller for the current request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

impl AuthUser {
    /// Default display name for lazily created profiles
    pub fn nickname(&self) -> String {
        self.email
            .split('@')
            .next()
            .unwrap_or(&self.email)
            .to_string()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER)?;
        let email = header_value(parts, USER_EMAIL_HEADER)?;
        Ok(AuthUser { user_id, email })
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<String, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthorized("Authorization required".to_string()))
}
