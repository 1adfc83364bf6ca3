//! Budget listing, upsert, and deletion endpoints.

use crate::{
    core::budget::{self, BudgetReport},
    entities::budget as budget_entity,
    web::{ApiError, AppState},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Payload for `PUT /api/users/:user_id/budgets`.
#[derive(Debug, Deserialize)]
pub struct UpsertBudgetRequest {
    /// Category the limit applies to
    pub category: String,
    /// Limit amount
    pub amount: f64,
}

/// `GET /api/users/:user_id/budgets` - evaluated spend-vs-limit rows.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BudgetReport>>, ApiError> {
    let report = budget::budget_overview(&state.db, user_id).await?;

    Ok(Json(report))
}

/// `PUT /api/users/:user_id/budgets` - creates or replaces the limit for a
/// category.
pub async fn upsert(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpsertBudgetRequest>,
) -> Result<Json<budget_entity::Model>, ApiError> {
    let saved = budget::upsert_budget(&state.db, user_id, req.category, req.amount).await?;

    Ok(Json(saved))
}

/// `DELETE /api/users/:user_id/budgets/:budget_id` - always answers 204;
/// a missing or foreign budget id is a silent no-op.
pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, budget_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    budget::delete_budget(&state.db, user_id, budget_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
