//! Wedding team endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{TeamMemberCreate, TeamMemberUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{EntityId, TEAM_ROLES, TeamMember};
use crate::error::AppError;

fn validate_role(role: &str) -> Result<(), AppError> {
    if TEAM_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "role must be one of: {}",
            TEAM_ROLES.join(", ")
        )))
    }
}

/// GET /api/weddings/{id}/team
pub async fn list_team_members(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    let members = state.db.get_team_members(&wedding_id).await?;
    Ok(Json(members))
}

/// POST /api/weddings/{id}/team
pub async fn create_team_member(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
    Json(request): Json<TeamMemberCreate>,
) -> Result<Json<TeamMember>, AppError> {
    validate_role(&request.role)?;

    let member = TeamMember {
        id: EntityId::new().0,
        wedding_id,
        user_id: request.user_id,
        name: request.name,
        email: request.email,
        role: request.role,
    };
    state.db.insert_team_member(&member).await?;

    Ok(Json(member))
}

/// PATCH /api/team/{id}
pub async fn update_team_member(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
    Json(updates): Json<TeamMemberUpdate>,
) -> Result<Json<TeamMember>, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("No updates provided".to_string()));
    }
    if let Some(role) = &updates.role {
        validate_role(role)?;
    }

    let member = state.db.update_team_member(&id, &updates).await?;
    Ok(Json(member))
}

/// DELETE /api/team/{id}
pub async fn delete_team_member(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_team_member(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
