//! Authentication extractors
//!
//! Protects routes that require an authenticated session.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use super::cookies::SESSION_COOKIE;
use crate::AppState;
use crate::error::AppError;

/// Extractor for the current authenticated user.
///
/// Resolves the `session_id` cookie through the session store and
/// yields the user id. Absent or unresolved session ids reject with
/// 401.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user_id): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(AppError::Unauthorized)?;

        let user_id = app_state
            .sessions
            .resolve(&session_id)
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(user_id))
    }
}
