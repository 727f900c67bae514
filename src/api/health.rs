//! Health check endpoint

use axum::{Json, Router, extract::State, routing::get};

use crate::AppState;

/// Create health router (GET /health)
pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /api/health
///
/// Reports liveness and whether the database answers a trivial query.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.db.ping().await {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "database": "connected",
        })),
        Err(error) => {
            tracing::error!(%error, "Health check database probe failed");
            Json(serde_json::json!({
                "status": "error",
                "database": "disconnected",
            }))
        }
    }
}
