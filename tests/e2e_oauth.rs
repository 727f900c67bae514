//! E2E tests for the Google OAuth flow and state token handling

mod common;

use axum::{Json, Router, routing::get, routing::post};
use common::{TestServer, no_redirect_client};
use tokio::net::TcpListener;

/// Stub for Google's token and userinfo endpoints.
///
/// Accepts any authorization code and always returns the same
/// profile, so callback tests exercise our side of the exchange.
async fn spawn_google_stub() -> String {
    let app = Router::new()
        .route(
            "/token",
            post(|| async {
                Json(serde_json::json!({
                    "access_token": "stub-access-token",
                    "token_type": "Bearer",
                }))
            }),
        )
        .route(
            "/userinfo",
            get(|| async {
                Json(serde_json::json!({
                    "email": "rahul@example.com",
                    "name": "Rahul Verma",
                }))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Start a login attempt and return (state token, initiator cookie value).
async fn start_login(server: &TestServer, client: &reqwest::Client) -> (String, String) {
    let response = client
        .get(server.url("/api/auth/google"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect location");
    let authorize_url = url::Url::parse(location).expect("authorize URL parses");
    let state_token = authorize_url
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state query parameter");

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("initiator Set-Cookie");
    assert!(set_cookie.starts_with("oauth_initiator="));
    let initiator = set_cookie
        .trim_start_matches("oauth_initiator=")
        .split(';')
        .next()
        .unwrap()
        .to_string();

    (state_token, initiator)
}

#[tokio::test]
async fn test_google_redirect_carries_state_and_initiator() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let response = client
        .get(server.url("/api/auth/google"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("state="));

    let (state_token, initiator) = start_login(&server, &client).await;
    assert!(!initiator.is_empty());
    // Wire format: payload and signature joined by a single dot,
    // signature as 64 hex characters.
    let (_, signature) = state_token.split_once('.').expect("two-part token");
    assert_eq!(signature.len(), 64);
    assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_callback_without_initiator_cookie_is_rejected() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let (state_token, _) = start_login(&server, &client).await;

    // Replay the state from a different browser: no cookie present.
    let response = client
        .get(server.url(&format!(
            "/api/auth/google/callback?code=anything&state={}",
            state_token
        )))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/login?error=state"
    );
}

#[tokio::test]
async fn test_callback_with_tampered_state_is_rejected() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let (state_token, initiator) = start_login(&server, &client).await;
    let mut tampered = state_token;
    tampered.pop();
    tampered.push('0');

    let response = client
        .get(server.url(&format!(
            "/api/auth/google/callback?code=anything&state={}",
            tampered
        )))
        .header("cookie", format!("oauth_initiator={}", initiator))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/login?error=state"
    );
}

#[tokio::test]
async fn test_full_login_against_stubbed_provider() {
    let stub_base = spawn_google_stub().await;
    let server = TestServer::with_google_stub(
        &format!("{}/token", stub_base),
        &format!("{}/userinfo", stub_base),
    )
    .await;
    let client = no_redirect_client();

    let (state_token, initiator) = start_login(&server, &client).await;

    let response = client
        .get(server.url(&format!(
            "/api/auth/google/callback?code=stub-code&state={}",
            state_token
        )))
        .header("cookie", format!("oauth_initiator={}", initiator))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get("location").unwrap(), "/");

    // A session cookie was issued for the account created from the
    // stubbed profile.
    let session_cookie = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session_id="))
        .expect("session Set-Cookie");
    let session_id = session_cookie
        .trim_start_matches("session_id=")
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = client
        .get(server.url("/api/auth/me"))
        .header("cookie", format!("session_id={}", session_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "rahul@example.com");
    assert_eq!(body["user"]["name"], "Rahul Verma");
}

#[tokio::test]
async fn test_state_is_single_use() {
    let stub_base = spawn_google_stub().await;
    let server = TestServer::with_google_stub(
        &format!("{}/token", stub_base),
        &format!("{}/userinfo", stub_base),
    )
    .await;
    let client = no_redirect_client();

    let (state_token, initiator) = start_login(&server, &client).await;
    let callback_url = server.url(&format!(
        "/api/auth/google/callback?code=stub-code&state={}",
        state_token
    ));

    let response = client
        .get(&callback_url)
        .header("cookie", format!("oauth_initiator={}", initiator))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers().get("location").unwrap(), "/");

    // The nonce was consumed; replaying the same state fails even
    // with the matching initiator cookie.
    let response = client
        .get(&callback_url)
        .header("cookie", format!("oauth_initiator={}", initiator))
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/login?error=state"
    );
}

#[tokio::test]
async fn test_callback_without_code_is_exchange_error() {
    let server = TestServer::new().await;
    let client = no_redirect_client();

    let (state_token, initiator) = start_login(&server, &client).await;

    let response = client
        .get(server.url(&format!(
            "/api/auth/google/callback?state={}",
            state_token
        )))
        .header("cookie", format!("oauth_initiator={}", initiator))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/login?error=exchange"
    );
}
