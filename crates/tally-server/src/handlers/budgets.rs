//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{resolve_user, AppError, AppState, SuccessResponse};
use tally_core::models::BudgetStatus;

/// GET /api/budgets/current - Budget usage for the current month
pub async fn get_current_budget(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Option<BudgetStatus>>, AppError> {
    let user = resolve_user(&state, request.headers())?;

    let today = Utc::now().date_naive();
    let status = state.db.budget_status(user.id, today)?;

    Ok(Json(status))
}

/// Request body for updating the budget
#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub amount: f64,
}

/// PUT /api/budgets - Set the monthly budget on the default account
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<SetBudgetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = resolve_user(&state, &headers)?;

    if !params.amount.is_finite() || params.amount < 0.0 {
        return Err(AppError::bad_request("Budget amount must be non-negative"));
    }

    let account = state
        .db
        .get_default_account(user.id)?
        .ok_or_else(|| AppError::bad_request("No default account to attach a budget to"))?;

    state.db.set_budget(account.id, params.amount)?;

    Ok(Json(SuccessResponse { success: true }))
}
