//! Common test utilities for E2E tests

use mandap::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::build(|_| {}).await
    }

    /// Create a test server with the Google endpoints pointed at a stub.
    pub async fn with_google_stub(token_url: &str, userinfo_url: &str) -> Self {
        let token_url = token_url.to_string();
        let userinfo_url = userinfo_url.to_string();
        Self::build(move |config| {
            config.auth.google.token_url = token_url.clone();
            config.auth.google.userinfo_url = userinfo_url.clone();
        })
        .await
    }

    async fn build(customize: impl FnOnce(&mut config::AppConfig)) -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let mut config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            auth: config::AuthConfig {
                state_secret: Some("test-state-secret-32-bytes-long!".to_string()),
                state_ttl_seconds: 600,
                session_max_age: 604_800,
                google: config::GoogleOAuthConfig {
                    client_id: "test-client-id".to_string(),
                    client_secret: "test-client-secret".to_string(),
                    auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                    token_url: "https://oauth2.googleapis.com/token".to_string(),
                    userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
                },
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };
        customize(&mut config);

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client with a cookie store so session cookies
        // flow across requests like a browser
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = mandap::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Sign up a user and return their id. The session cookie lands
    /// in the client's cookie store.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("signup request succeeds");
        assert_eq!(response.status(), 200, "signup should succeed");

        let body: serde_json::Value = response.json().await.expect("signup body");
        body["user"]["id"].as_str().expect("user id").to_string()
    }

    /// Create a wedding through the API and return its id.
    pub async fn create_wedding(&self, couple_names: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/weddings"))
            .json(&serde_json::json!({
                "couple_names": couple_names,
                "date": "2026-11-21",
                "city": "Jaipur",
                "total_budget": 500000,
            }))
            .send()
            .await
            .expect("create wedding request succeeds");
        assert_eq!(response.status(), 200, "create wedding should succeed");

        let body: serde_json::Value = response.json().await.expect("wedding body");
        body["id"].as_str().expect("wedding id").to_string()
    }
}

/// Client that does not follow redirects, for inspecting OAuth hops.
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build no-redirect client")
}
