//! Guest list endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{GuestCreate, GuestUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{EntityId, Guest, RSVP_STATUSES};
use crate::error::AppError;

fn validate_side(side: &str) -> Result<(), AppError> {
    match side {
        "bride" | "groom" => Ok(()),
        _ => Err(AppError::Validation(
            "side must be one of: bride, groom".to_string(),
        )),
    }
}

fn validate_rsvp_status(status: &str) -> Result<(), AppError> {
    if RSVP_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "rsvp_status must be one of: {}",
            RSVP_STATUSES.join(", ")
        )))
    }
}

/// GET /api/weddings/{id}/guests
pub async fn list_guests(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
) -> Result<Json<Vec<Guest>>, AppError> {
    let guests = state.db.get_guests(&wedding_id).await?;
    Ok(Json(guests))
}

/// POST /api/weddings/{id}/guests
pub async fn create_guest(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
    Json(request): Json<GuestCreate>,
) -> Result<Json<Guest>, AppError> {
    validate_side(&request.side)?;
    validate_rsvp_status(&request.rsvp_status)?;

    let guest = Guest {
        id: EntityId::new().0,
        wedding_id,
        name: request.name,
        phone: request.phone,
        side: request.side,
        rsvp_status: request.rsvp_status,
        accompanying_count: request.accompanying_count,
    };
    state.db.insert_guest(&guest).await?;

    Ok(Json(guest))
}

/// PATCH /api/guests/{id}
pub async fn update_guest(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
    Json(updates): Json<GuestUpdate>,
) -> Result<Json<Guest>, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("No updates provided".to_string()));
    }
    if let Some(side) = &updates.side {
        validate_side(side)?;
    }
    if let Some(status) = &updates.rsvp_status {
        validate_rsvp_status(status)?;
    }

    let guest = state.db.update_guest(&id, &updates).await?;
    Ok(Json(guest))
}

/// DELETE /api/guests/{id}
///
/// Idempotent: deleting an absent guest still succeeds.
pub async fn delete_guest(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_guest(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
