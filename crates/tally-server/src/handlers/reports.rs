//! Report handlers
//!
//! The report flow runs once per request: resolve identity, load the month,
//! aggregate, generate insights, then either return JSON or dispatch an
//! email. Delivery failure is the one error surfaced as a hard 500.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{resolve_user, AppError, AppState};
use tally_core::models::PeriodStatistics;

/// Response for GET /api/reports/current
#[derive(Serialize)]
pub struct CurrentReportResponse {
    pub success: bool,
    pub stats: PeriodStatistics,
    pub insights: Vec<String>,
    pub month: String,
}

/// GET /api/reports/current - Assemble this month's report as JSON
pub async fn get_current_report(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<CurrentReportResponse>, AppError> {
    let user = resolve_user(&state, request.headers())?;

    let payload = state.reports.current_report(&user).await?;

    Ok(Json(CurrentReportResponse {
        success: true,
        stats: payload.stats,
        insights: payload.insights,
        month: payload.month,
    }))
}

/// Response for a successful report dispatch
#[derive(Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/reports/generate - Generate this month's report and email it
///
/// 401 without identity, 404 for an unknown user, 400 when no email is on
/// file, 500 when the delivery backend fails.
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let user = resolve_user(&state, request.headers())?;

    if user
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .is_none()
    {
        return Err(AppError::bad_request(
            "No email address found for your account",
        ));
    }

    let result = state.reports.generate_and_send(&user).await?;

    if !result.success {
        error!(user = user.id, "Report delivery failed: {}", result.detail);
        return Ok(delivery_failure(&result.detail));
    }

    Ok(Json(GenerateReportResponse {
        success: true,
        message: "Report generated and sent to your email".to_string(),
    })
    .into_response())
}

/// Request body for the demo-report harness
#[derive(Debug, Default, Deserialize)]
pub struct TestReportRequest {
    /// Recipient override; defaults to the caller's email on file
    pub to: Option<String>,
    /// Display name used in the rendered email
    pub name: Option<String>,
    /// Use the live insight backend instead of the fallback list
    #[serde(default)]
    pub live_insights: bool,
}

/// POST /api/reports/test - Send a demo report built from sample statistics
///
/// Single parameterized harness for exercising the delivery path without
/// real data.
pub async fn send_test_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<TestReportRequest>>,
) -> Result<Response, AppError> {
    let Json(params) = body.unwrap_or_default();

    // Fall back to the caller's address when no recipient is given
    let (to, name) = match params.to {
        Some(to) => (to, params.name.unwrap_or_else(|| "there".to_string())),
        None => {
            let user = resolve_user(&state, &headers)?;
            let email = user
                .email
                .clone()
                .ok_or_else(|| AppError::bad_request("No recipient given and no email on file"))?;
            (email, params.name.unwrap_or(user.name))
        }
    };

    let result = state
        .reports
        .send_sample_report(&to, &name, params.live_insights)
        .await?;

    if !result.success {
        error!(to = %to, "Demo report delivery failed: {}", result.detail);
        return Ok(delivery_failure(&result.detail));
    }

    Ok(Json(GenerateReportResponse {
        success: true,
        message: format!("Test report sent to {}", to),
    })
    .into_response())
}

/// Delivery failure response: 500 with the structured failure detail
fn delivery_failure(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "success": false,
            "error": format!("Email sending failed: {}", detail),
        })),
    )
        .into_response()
}
