//! Google OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with Google,
//! guarded by the signed state token from [`super::state`].
//!
//! Every failure on the callback path collapses to a redirect with an
//! opaque error marker; which check failed is never disclosed to the
//! browser. Full detail goes to the server log.

use axum::{
    Router,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;

use super::cookies::{
    self, INITIATOR_COOKIE, initiator_cookie, persistent_session_cookie, request_is_secure,
};
use super::state::generate_nonce;
use crate::AppState;
use crate::data::{EntityId, User};
use crate::error::AppError;
use crate::metrics::{
    OAUTH_EXCHANGE_FAILURES_TOTAL, OAUTH_STATE_ISSUED_TOTAL, OAUTH_STATE_REJECTIONS_TOTAL,
};

/// Where the browser lands after a failed OAuth attempt.
///
/// The `error` query value is an opaque marker: `state` for any state
/// verification failure, `exchange` for token endpoint failures,
/// `profile` for userinfo/missing-email failures.
const LOGIN_ERROR_PATH: &str = "/login?error=";

/// Create OAuth router
///
/// Routes:
/// - GET /google - Redirect to Google authorization page
/// - GET /google/callback - OAuth callback
pub fn oauth_router() -> Router<AppState> {
    Router::new()
        .route("/google", get(google_redirect))
        .route("/google/callback", get(google_callback))
}

// =============================================================================
// Redirect to Google
// =============================================================================

/// GET /api/auth/google
///
/// Starts a login attempt:
/// 1. Mint a random initiator nonce for this attempt
/// 2. Issue a signed state token bound to it
/// 3. Store the initiator in the oauth_initiator cookie
/// 4. Redirect to Google with client_id, redirect_uri, scope, state
async fn google_redirect(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let initiator = generate_nonce();
    let state_token = state.oauth_state.issue(&initiator)?;

    let redirect_uri = format!("{}/api/auth/google/callback", state.config.server.base_url());
    let mut authorize_url = url::Url::parse(&state.config.auth.google.auth_url)
        .map_err(|e| AppError::Config(format!("invalid auth.google.auth_url: {e}")))?;
    authorize_url
        .query_pairs_mut()
        .append_pair("client_id", &state.config.auth.google.client_id)
        .append_pair("redirect_uri", &redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", "openid email profile")
        .append_pair("state", &state_token);

    OAUTH_STATE_ISSUED_TOTAL.with_label_values(&["google"]).inc();

    let secure = request_is_secure(&headers, &state.config);
    let jar = jar.add(initiator_cookie(
        &initiator,
        state.config.auth.state_ttl_seconds,
        secure,
    ));

    Ok((jar, Redirect::to(authorize_url.as_str())))
}

// =============================================================================
// Callback from Google
// =============================================================================

/// Query parameters from the Google callback
#[derive(Debug, Deserialize)]
struct GoogleCallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// State token issued by us
    state: Option<String>,
}

/// Google token endpoint response
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Google userinfo response
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
    name: Option<String>,
}

/// GET /api/auth/google/callback
///
/// Completes a login attempt. No session is created or reused until
/// the state verifies, the code exchange succeeds, and the profile
/// fetch returns a usable email — in that order, with no external
/// call made under any lock.
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let initiator = jar
        .get(INITIATOR_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .unwrap_or_default();
    let state_token = query.state.unwrap_or_default();

    // 1. State verification. Any rejection collapses to the same
    //    opaque redirect; the reason stays in logs and metrics.
    if let Err(rejection) = state.oauth_state.verify(&state_token, &initiator) {
        OAUTH_STATE_REJECTIONS_TOTAL
            .with_label_values(&[rejection.as_str()])
            .inc();
        tracing::warn!(reason = rejection.as_str(), "OAuth state rejected");
        return Ok(login_error_redirect(jar, "state"));
    }

    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        OAUTH_EXCHANGE_FAILURES_TOTAL
            .with_label_values(&["exchange"])
            .inc();
        tracing::warn!("OAuth callback arrived without an authorization code");
        return Ok(login_error_redirect(jar, "exchange"));
    };

    // 2. Exchange the authorization code for an access token.
    let access_token = match exchange_code(&state, &code).await {
        Ok(token) => token,
        Err(error) => {
            OAUTH_EXCHANGE_FAILURES_TOTAL
                .with_label_values(&["exchange"])
                .inc();
            tracing::error!(%error, "OAuth code exchange failed");
            return Ok(login_error_redirect(jar, "exchange"));
        }
    };

    // 3. Fetch the profile; an email is required to key the account.
    let profile = match fetch_profile(&state, &access_token).await {
        Ok(profile) => profile,
        Err(error) => {
            OAUTH_EXCHANGE_FAILURES_TOTAL
                .with_label_values(&["profile"])
                .inc();
            tracing::error!(%error, "OAuth profile fetch failed");
            return Ok(login_error_redirect(jar, "profile"));
        }
    };
    let Some(email) = profile.email.filter(|email| !email.is_empty()) else {
        OAUTH_EXCHANGE_FAILURES_TOTAL
            .with_label_values(&["profile"])
            .inc();
        tracing::error!("OAuth profile did not include an email");
        return Ok(login_error_redirect(jar, "profile"));
    };

    // 4. Only now touch user data and the session store.
    let user = match state.db.get_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            let user = User {
                id: EntityId::new().0,
                name: profile.name.unwrap_or_else(|| email.clone()),
                email: Some(email.clone()),
                phone: None,
                password: None,
                created_at: Utc::now(),
            };
            state.db.insert_user(&user).await?;
            tracing::info!(user_id = %user.id, "Created user from Google profile");
            user
        }
    };

    let session_id = state.sessions.create(&user.id);
    let secure = request_is_secure(&headers, &state.config);
    let jar = jar
        .remove(cookies::clear_initiator_cookie())
        .add(persistent_session_cookie(
            &session_id,
            state.config.auth.session_max_age,
            secure,
        ));

    tracing::info!(user_id = %user.id, "Google login completed");

    Ok((jar, Redirect::to("/")))
}

fn login_error_redirect(jar: CookieJar, marker: &str) -> (CookieJar, Redirect) {
    (jar, Redirect::to(&format!("{LOGIN_ERROR_PATH}{marker}")))
}

/// POST the authorization code to Google's token endpoint.
async fn exchange_code(state: &AppState, code: &str) -> Result<String, AppError> {
    let redirect_uri = format!("{}/api/auth/google/callback", state.config.server.base_url());

    let response = state
        .http_client
        .post(&state.config.auth.google.token_url)
        .form(&[
            ("client_id", state.config.auth.google.client_id.as_str()),
            (
                "client_secret",
                state.config.auth.google.client_secret.as_str(),
            ),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "token endpoint returned {}",
            response.status()
        )));
    }

    let token: GoogleTokenResponse = response.json().await?;
    Ok(token.access_token)
}

/// Fetch the user's profile from Google's userinfo endpoint.
async fn fetch_profile(state: &AppState, access_token: &str) -> Result<GoogleUserInfo, AppError> {
    let response = state
        .http_client
        .get(&state.config.auth.google.userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "userinfo endpoint returned {}",
            response.status()
        )));
    }

    Ok(response.json().await?)
}
