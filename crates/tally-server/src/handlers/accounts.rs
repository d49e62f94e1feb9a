//! Account handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};

use crate::{resolve_user, AppError, AppState};
use tally_core::models::Account;

/// GET /api/accounts - List the caller's accounts
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Account>>, AppError> {
    let user = resolve_user(&state, request.headers())?;
    let accounts = state.db.list_accounts(user.id)?;
    Ok(Json(accounts))
}
