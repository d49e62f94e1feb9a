//! Authentication-related handlers

use std::sync::Arc;

use axum::extract::Request;
use axum::{extract::State, Json};
use serde::Serialize;

use crate::{get_user_id, AppState};

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    /// The caller's external user id, if an identity header was forwarded
    pub user: Option<String>,
    /// Whether a matching user record exists locally
    pub known: bool,
}

/// Get the currently authenticated user
pub async fn get_me(State(state): State<Arc<AppState>>, request: Request) -> Json<MeResponse> {
    let user = get_user_id(request.headers());

    let known = match user.as_deref() {
        Some(external_id) => state
            .db
            .get_user_by_external_id(external_id)
            .ok()
            .flatten()
            .is_some(),
        None => false,
    };

    Json(MeResponse { user, known })
}
