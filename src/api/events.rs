//! Timeline event endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{TimelineEventCreate, TimelineEventUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{EntityId, TimelineEvent};
use crate::error::AppError;

/// GET /api/weddings/{id}/events
pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
) -> Result<Json<Vec<TimelineEvent>>, AppError> {
    let events = state.db.get_events(&wedding_id).await?;
    Ok(Json(events))
}

/// POST /api/weddings/{id}/events
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
    Json(request): Json<TimelineEventCreate>,
) -> Result<Json<TimelineEvent>, AppError> {
    let event = TimelineEvent {
        id: EntityId::new().0,
        wedding_id,
        title: request.title,
        date_time: request.date_time,
        venue: request.venue,
        notes: request.notes,
    };
    state.db.insert_event(&event).await?;

    Ok(Json(event))
}

/// PATCH /api/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
    Json(updates): Json<TimelineEventUpdate>,
) -> Result<Json<TimelineEvent>, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("No updates provided".to_string()));
    }

    let event = state.db.update_event(&id, &updates).await?;
    Ok(Json(event))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_event(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
