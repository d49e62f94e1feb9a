//! Tally Web Server
//!
//! Axum-based REST API for the Tally personal finance service.
//!
//! Identity is delegated to an external provider: a gateway in front of this
//! server is expected to authenticate the caller and forward their opaque
//! user id in the `X-Tally-User` header. The server resolves that id against
//! the local user table; it holds no sessions of its own.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::db::Database;
use tally_core::models::User;
use tally_core::{InsightClient, Mailer, ReportService};

mod handlers;

/// Header carrying the authenticated caller's external user id
const USER_ID_HEADER: &str = "x-tally-user";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether the identity header is required on /api routes
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub reports: ReportService,
}

/// Authentication middleware - requires the identity header when configured
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if user_id.is_some() {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no identity header");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Extract the caller's external user id from request headers
pub fn get_user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Resolve the caller to a stored user record
///
/// Missing identity fails with 401, an unknown identity with 404; this is
/// the fail-fast tier of the error policy.
pub fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let external_id =
        get_user_id(headers).ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

    state
        .db
        .get_user_by_external_id(&external_id)?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router with collaborators built from the environment
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let insights = InsightClient::from_env();
    if let Some(ref client) = insights {
        info!(
            "Insight backend configured: {} (model: {})",
            client.host(),
            client.model()
        );
    } else {
        info!("Insight backend not configured (set GEMINI_API_KEY); reports use fallback insights");
    }

    let mailer = Mailer::from_env();
    info!("Mail backend: {}", mailer.backend_name());

    create_router_with_options(db, config, insights, mailer)
}

/// Create the application router with explicit collaborators (for testing)
pub fn create_router_with_options(
    db: Database,
    config: ServerConfig,
    insights: Option<InsightClient>,
    mailer: Mailer,
) -> Router {
    let reports = ReportService::new(db.clone(), insights, mailer);

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        reports,
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", axum::routing::get(handlers::get_me))
        // Dashboard
        .route("/dashboard", axum::routing::get(handlers::get_dashboard))
        // Accounts
        .route("/accounts", axum::routing::get(handlers::list_accounts))
        // Transactions
        .route(
            "/transactions",
            axum::routing::get(handlers::list_transactions),
        )
        // Budgets
        .route(
            "/budgets/current",
            axum::routing::get(handlers::get_current_budget),
        )
        .route("/budgets", axum::routing::put(handlers::set_budget))
        // Reports
        .route(
            "/reports/current",
            axum::routing::get(handlers::get_current_report),
        )
        .route(
            "/reports/generate",
            axum::routing::post(handlers::generate_report),
        )
        .route(
            "/reports/test",
            axum::routing::post(handlers::send_test_report),
        );

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("Authentication disabled - do not expose to network!");
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
