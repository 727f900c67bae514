//! Budget item endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{BudgetItemCreate, BudgetItemUpdate};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{BudgetItem, EntityId};
use crate::error::AppError;

/// GET /api/weddings/{id}/budget
pub async fn list_budget_items(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
) -> Result<Json<Vec<BudgetItem>>, AppError> {
    let items = state.db.get_budget_items(&wedding_id).await?;
    Ok(Json(items))
}

/// POST /api/weddings/{id}/budget
pub async fn create_budget_item(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(wedding_id): Path<String>,
    Json(request): Json<BudgetItemCreate>,
) -> Result<Json<BudgetItem>, AppError> {
    let item = BudgetItem {
        id: EntityId::new().0,
        wedding_id,
        category: request.category,
        description: request.description,
        planned: request.planned,
        actual: request.actual,
    };
    state.db.insert_budget_item(&item).await?;

    Ok(Json(item))
}

/// PATCH /api/budget/{id}
pub async fn update_budget_item(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
    Json(updates): Json<BudgetItemUpdate>,
) -> Result<Json<BudgetItem>, AppError> {
    if updates.is_empty() {
        return Err(AppError::Validation("No updates provided".to_string()));
    }

    let item = state.db.update_budget_item(&id, &updates).await?;
    Ok(Json(item))
}

/// DELETE /api/budget/{id}
pub async fn delete_budget_item(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_budget_item(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
