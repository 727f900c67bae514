//! Password and phone authentication endpoints

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use sha2::{Digest, Sha256};

use super::dto::{LoginRequest, PhoneLoginRequest, SignupRequest};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::auth::cookies::{self, request_is_secure, session_cookie};
use crate::data::{EntityId, User, UserProfile};
use crate::error::AppError;
use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL};

/// Create auth router
///
/// Routes:
/// - POST /signup - Email/password registration
/// - POST /login - Email/password login
/// - POST /logout - Destroy the session
/// - GET /me - Current user profile
/// - POST /phone - Phone login after OTP verification
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/phone", post(phone_login))
}

/// SHA-256 hex digest of a password.
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// POST /api/auth/signup
async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/api/auth/signup"])
        .start_timer();

    if state.db.get_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let user = User {
        id: EntityId::new().0,
        name: request.name,
        email: Some(request.email),
        phone: None,
        password: Some(hash_password(&request.password)),
        created_at: Utc::now(),
    };
    state.db.insert_user(&user).await?;

    let session_id = state.sessions.create(&user.id);
    let secure = request_is_secure(&headers, &state.config);
    let jar = jar.add(session_cookie(&session_id, secure));

    tracing::info!(user_id = %user.id, "User signed up");
    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/api/auth/signup", "200"])
        .inc();

    Ok((
        jar,
        Json(serde_json::json!({ "user": UserProfile::from(user) })),
    ))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/api/auth/login"])
        .start_timer();

    let user = state
        .db
        .get_user_by_email(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Same rejection for unknown email and wrong password.
    if user.password.as_deref() != Some(hash_password(&request.password).as_str()) {
        return Err(AppError::Unauthorized);
    }

    let session_id = state.sessions.create(&user.id);
    let secure = request_is_secure(&headers, &state.config);
    let jar = jar.add(session_cookie(&session_id, secure));

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/api/auth/login", "200"])
        .inc();

    Ok((
        jar,
        Json(serde_json::json!({ "user": UserProfile::from(user) })),
    ))
}

/// POST /api/auth/logout
///
/// Destroys the session if one exists; always clears the cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(cookies::SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }

    let jar = jar.remove(cookies::clear_session_cookie());
    (jar, Json(serde_json::json!({ "success": true })))
}

/// GET /api/auth/me
async fn me(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.db.get_user(&user_id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(serde_json::json!({ "user": UserProfile::from(user) })))
}

/// POST /api/auth/phone
///
/// Login or signup with a phone number after OTP verification.
///
/// Must only be reachable through the fronting proxy, which verifies
/// the OTP and sets X-Phone-Verified. Direct calls are rejected.
async fn phone_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(request): Json<PhoneLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let verified = headers
        .get("x-phone-verified")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "true");
    if !verified {
        return Err(AppError::Forbidden(
            "Direct access not allowed. Please verify your phone via OTP first.".to_string(),
        ));
    }

    let secure = request_is_secure(&headers, &state.config);

    if let Some(user) = state.db.get_user_by_phone(&request.phone).await? {
        let session_id = state.sessions.create(&user.id);
        let jar = jar.add(session_cookie(&session_id, secure));
        return Ok((
            jar,
            Json(serde_json::json!({ "user": UserProfile::from(user) })),
        ));
    }

    // New phone number: create an account on the spot.
    let name = request.name.unwrap_or_else(|| {
        let suffix = request
            .phone
            .get(request.phone.len().saturating_sub(4)..)
            .unwrap_or(request.phone.as_str());
        format!("User {suffix}")
    });
    let user = User {
        id: EntityId::new().0,
        name,
        email: None,
        phone: Some(request.phone),
        password: None,
        created_at: Utc::now(),
    };
    state.db.insert_user(&user).await?;

    let session_id = state.sessions.create(&user.id);
    let jar = jar.add(session_cookie(&session_id, secure));

    tracing::info!(user_id = %user.id, "User created via phone login");

    Ok((
        jar,
        Json(serde_json::json!({
            "user": UserProfile::from(user),
            "isNewUser": true,
        })),
    ))
}
