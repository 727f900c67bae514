//! Wedding endpoints
//!
//! Wedding CRUD plus the dashboard stats aggregation.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use chrono::Utc;

use super::dto::{WeddingCreate, WeddingUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{EntityId, TeamMember, Wedding, WeddingStats};
use crate::error::AppError;
use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL};

/// Create weddings router (nested under /api/weddings)
pub fn weddings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_weddings).post(create_wedding))
        .route("/:id", get(get_wedding).patch(update_wedding))
        .route("/:id/stats", get(get_stats))
        .route(
            "/:id/guests",
            get(super::guests::list_guests).post(super::guests::create_guest),
        )
        .route(
            "/:id/events",
            get(super::events::list_events).post(super::events::create_event),
        )
        .route(
            "/:id/tasks",
            get(super::tasks::list_tasks).post(super::tasks::create_task),
        )
        .route(
            "/:id/budget",
            get(super::budget::list_budget_items).post(super::budget::create_budget_item),
        )
        .route(
            "/:id/team",
            get(super::team::list_team_members).post(super::team::create_team_member),
        )
}

/// Standalone router for PATCH/DELETE by resource id
/// (nested under /api)
pub fn resources_router() -> Router<AppState> {
    Router::new()
        .route(
            "/guests/:id",
            patch(super::guests::update_guest).delete(super::guests::delete_guest),
        )
        .route(
            "/events/:id",
            patch(super::events::update_event).delete(super::events::delete_event),
        )
        .route(
            "/tasks/:id",
            patch(super::tasks::update_task).delete(super::tasks::delete_task),
        )
        .route(
            "/budget/:id",
            patch(super::budget::update_budget_item).delete(super::budget::delete_budget_item),
        )
        .route(
            "/team/:id",
            patch(super::team::update_team_member).delete(super::team::delete_team_member),
        )
}

/// GET /api/weddings
async fn list_weddings(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Wedding>>, AppError> {
    let weddings = state.db.get_weddings_by_owner(&user_id).await?;
    Ok(Json(weddings))
}

/// GET /api/weddings/{id}
async fn get_wedding(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Wedding>, AppError> {
    let wedding = state.db.get_wedding(&id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(wedding))
}

/// POST /api/weddings
///
/// Creates the wedding and seeds the team with an "owner" member for
/// the creating user.
async fn create_wedding(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<WeddingCreate>,
) -> Result<Json<Wedding>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/api/weddings"])
        .start_timer();

    let owner = state.db.get_user(&user_id).await?;

    let wedding = Wedding {
        id: EntityId::new().0,
        couple_names: request.couple_names,
        date: request.date,
        city: request.city,
        haldi_date_time: request.haldi_date_time,
        sangeet_date_time: request.sangeet_date_time,
        wedding_date_time: request.wedding_date_time,
        total_budget: request.total_budget,
        owner_id: user_id.clone(),
        created_at: Utc::now(),
    };
    state.db.insert_wedding(&wedding).await?;

    let owner_name = request
        .owner_name
        .or_else(|| owner.as_ref().map(|user| user.name.clone()))
        .unwrap_or_else(|| "Owner".to_string());
    let owner_email = request
        .owner_email
        .or_else(|| owner.and_then(|user| user.email))
        .unwrap_or_default();

    let member = TeamMember {
        id: EntityId::new().0,
        wedding_id: wedding.id.clone(),
        user_id: Some(user_id),
        name: owner_name,
        email: owner_email,
        role: "owner".to_string(),
    };
    state.db.insert_team_member(&member).await?;

    tracing::info!(wedding_id = %wedding.id, "Wedding created");
    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/api/weddings", "200"])
        .inc();

    Ok(Json(wedding))
}

/// PATCH /api/weddings/{id}
async fn update_wedding(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
    Json(updates): Json<WeddingUpdate>,
) -> Result<Json<Wedding>, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("No updates provided".to_string()));
    }

    let wedding = state.db.update_wedding(&id, &updates).await?;
    Ok(Json(wedding))
}

/// GET /api/weddings/{id}/stats
async fn get_stats(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WeddingStats>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/api/weddings/:id/stats"])
        .start_timer();

    let stats = state.db.get_wedding_stats(&id).await?;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/api/weddings/:id/stats", "200"])
        .inc();
    Ok(Json(stats))
}
