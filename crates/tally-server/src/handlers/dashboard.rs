//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::{resolve_user, AppError, AppState};
use tally_core::models::{Account, BudgetStatus, Transaction};

/// Number of recent transactions shown on the dashboard
const RECENT_LIMIT: i64 = 20;

/// Dashboard response: accounts, recent transactions, budget usage
#[derive(Serialize)]
pub struct DashboardResponse {
    pub accounts: Vec<Account>,
    pub recent_transactions: Vec<Transaction>,
    /// None when the user has no default account or no budget set
    pub budget: Option<BudgetStatus>,
}

/// GET /api/dashboard - Accounts, recent transactions, and budget usage
///
/// The account and transaction loads are independent of each other; both
/// come from the same pooled database so they are issued back to back.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = resolve_user(&state, request.headers())?;

    let accounts = state.db.list_accounts(user.id)?;
    let recent_transactions = state.db.list_recent_transactions(user.id, RECENT_LIMIT)?;

    let today = Utc::now().date_naive();
    let budget = state.db.budget_status(user.id, today)?;

    Ok(Json(DashboardResponse {
        accounts,
        recent_transactions,
        budget,
    }))
}
