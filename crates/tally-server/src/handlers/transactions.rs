//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{resolve_user, AppError, AppState};
use tally_core::models::Transaction;

/// Maximum transactions returned per request
const MAX_LIMIT: i64 = 500;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub limit: Option<i64>,
}

/// GET /api/transactions - The caller's most recent transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionsQuery>,
    request: Request,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user = resolve_user(&state, request.headers())?;

    let limit = params.limit.unwrap_or(50).clamp(1, MAX_LIMIT);
    let transactions = state.db.list_recent_transactions(user.id, limit)?;

    Ok(Json(transactions))
}
