//! Cookie construction helpers
//!
//! Both auth cookies are HTTP-only and SameSite=Lax. The Secure flag
//! follows the request's forwarded-protocol header when a proxy set
//! one; without a trustworthy proxy header it falls back to server
//! configuration.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "session_id";
pub const INITIATOR_COOKIE: &str = "oauth_initiator";

/// Decide whether cookies for this request should carry Secure.
pub fn request_is_secure(headers: &HeaderMap, config: &AppConfig) -> bool {
    match headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
    {
        Some(proto) => proto.trim().eq_ignore_ascii_case("https"),
        None => config.should_use_secure_cookies(),
    }
}

/// Session cookie with browser-session lifetime (password logins).
pub fn session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Session cookie persisted after an OAuth login.
pub fn persistent_session_cookie(
    session_id: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_seconds))
        .build()
}

/// Removal cookie for the session.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Initiator-binding cookie set when an OAuth flow starts.
///
/// Max-Age matches the state expiry window; the cookie is useless
/// once the state token it binds to has expired.
pub fn initiator_cookie(initiator: &str, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((INITIATOR_COOKIE, initiator.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(ttl_seconds))
        .build()
}

/// Removal cookie for the initiator, set after a completed callback.
pub fn clear_initiator_cookie() -> Cookie<'static> {
    Cookie::build((INITIATOR_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::local_test_config;

    #[test]
    fn forwarded_proto_overrides_config() {
        let config = local_test_config();
        let mut headers = HeaderMap::new();

        assert!(!request_is_secure(&headers, &config));

        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert!(request_is_secure(&headers, &config));

        headers.insert("x-forwarded-proto", "http".parse().unwrap());
        assert!(!request_is_secure(&headers, &config));
    }

    #[test]
    fn initiator_cookie_is_http_only_lax() {
        let cookie = initiator_cookie("init", 600, true);
        assert_eq!(cookie.name(), INITIATOR_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(600)));
    }

    #[test]
    fn session_cookie_defaults_to_browser_session_lifetime() {
        let cookie = session_cookie("sid", false);
        assert_eq!(cookie.max_age(), None);

        let cookie = persistent_session_cookie("sid", 604_800, false);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(604_800)));
    }
}
