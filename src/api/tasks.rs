//! Planning task endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{TaskCreate, TaskUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{EntityId, TASK_STATUSES, Task};
use crate::error::AppError;

fn validate_status(status: &str) -> Result<(), AppError> {
    if TASK_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "status must be one of: {}",
            TASK_STATUSES.join(", ")
        )))
    }
}

/// GET /api/weddings/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.db.get_tasks(&wedding_id).await?;
    Ok(Json(tasks))
}

/// POST /api/weddings/{id}/tasks
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
    Json(request): Json<TaskCreate>,
) -> Result<Json<Task>, AppError> {
    validate_status(&request.status)?;

    let task = Task {
        id: EntityId::new().0,
        wedding_id,
        title: request.title,
        status: request.status,
        due_date: request.due_date,
        assigned_to: request.assigned_to,
    };
    state.db.insert_task(&task).await?;

    Ok(Json(task))
}

/// PATCH /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
    Json(updates): Json<TaskUpdate>,
) -> Result<Json<Task>, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("No updates provided".to_string()));
    }
    if let Some(status) = &updates.status {
        validate_status(status)?;
    }

    let task = state.db.update_task(&id, &updates).await?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_task(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
