//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tally_core::ai::MockBackend;
use tally_core::db::Database;
use tally_core::mail::MockMailer;
use tally_core::models::{NewTransaction, TransactionKind};
use tower::ServiceExt;

fn test_config() -> ServerConfig {
    ServerConfig {
        require_auth: true,
        allowed_origins: vec![],
    }
}

/// Router over a fresh database with mock collaborators
fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    setup_app_with(db, MockMailer::new())
}

fn setup_app_with(db: Database, mailer: MockMailer) -> Router {
    create_router_with_options(
        db,
        test_config(),
        Some(InsightClient::Mock(MockBackend::new())),
        Mailer::Mock(mailer),
    )
}

/// Create a user and return their external id for the identity header
fn seed_user(db: &Database, email: Option<&str>) -> String {
    db.create_user("user-1", "Ada", email).unwrap();
    "user-1".to_string()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ========== Authentication Tests ==========

#[tokio::test]
async fn test_auth_required() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // No identity header at all
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header(USER_ID_HEADER, "   ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Blank header counts as missing
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_unknown_user() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header(USER_ID_HEADER, "nobody")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "User not found");
}

#[tokio::test]
async fn test_auth_disabled_skips_header_check() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
    };
    let app = create_router_with_options(
        db,
        config,
        Some(InsightClient::Mock(MockBackend::new())),
        Mailer::Mock(MockMailer::new()),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The middleware lets it through; /me reports an anonymous caller
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["known"], false);
}

#[tokio::test]
async fn test_get_me() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["user"], "user-1");
    assert_eq!(json["known"], true);
}

// ========== Dashboard API Tests ==========

#[tokio::test]
async fn test_get_dashboard() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let user = db.get_user_by_external_id(&external_id).unwrap().unwrap();
    let account_id = db.create_account(user.id, "Checking", true).unwrap();
    db.insert_transaction(
        account_id,
        &NewTransaction {
            kind: TransactionKind::Expense,
            category: Some("Food".into()),
            amount: 42.50,
            date: chrono::Utc::now().date_naive(),
            description: Some("Groceries".into()),
        },
    )
    .unwrap();
    db.set_budget(account_id, 1000.0).unwrap();

    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["accounts"].as_array().unwrap().len(), 1);
    assert_eq!(json["recent_transactions"].as_array().unwrap().len(), 1);
    assert_eq!(json["budget"]["budget"]["amount"], 1000.0);
    assert_eq!(json["budget"]["current_expenses"], 42.50);
}

#[tokio::test]
async fn test_get_dashboard_without_budget() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["budget"].is_null());
    assert!(json["accounts"].as_array().unwrap().is_empty());
}

// ========== Account API Tests ==========

#[tokio::test]
async fn test_list_accounts() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let user = db.get_user_by_external_id(&external_id).unwrap().unwrap();
    db.create_account(user.id, "Checking", true).unwrap();
    db.create_account(user.id, "Savings", false).unwrap();

    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let accounts = json.as_array().unwrap();
    assert_eq!(accounts.len(), 2);
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_list_transactions_with_limit() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let user = db.get_user_by_external_id(&external_id).unwrap().unwrap();
    let account_id = db.create_account(user.id, "Checking", true).unwrap();

    for day in 1..=5 {
        db.insert_transaction(
            account_id,
            &NewTransaction {
                kind: TransactionKind::Expense,
                category: Some("Food".into()),
                amount: 10.0,
                date: chrono::NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
                description: None,
            },
        )
        .unwrap();
    }

    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/transactions?limit=3")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let transactions = json.as_array().unwrap();
    assert_eq!(transactions.len(), 3);
    // Most recent first
    assert_eq!(transactions[0]["date"], "2026-08-05");
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_set_and_get_budget() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let user = db.get_user_by_external_id(&external_id).unwrap().unwrap();
    db.create_account(user.id, "Checking", true).unwrap();

    let app = setup_app_with(db, MockMailer::new());

    let body = serde_json::json!({ "amount": 2500.0 });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/budgets")
                .header(USER_ID_HEADER, &external_id)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/budgets/current")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["budget"]["amount"], 2500.0);
    assert_eq!(json["current_expenses"], 0.0);
}

#[tokio::test]
async fn test_set_budget_rejects_negative_amount() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let user = db.get_user_by_external_id(&external_id).unwrap().unwrap();
    db.create_account(user.id, "Checking", true).unwrap();

    let app = setup_app_with(db, MockMailer::new());

    let body = serde_json::json!({ "amount": -100.0 });
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/budgets")
                .header(USER_ID_HEADER, &external_id)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_budget_without_default_account() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);

    let app = setup_app_with(db, MockMailer::new());

    let body = serde_json::json!({ "amount": 500.0 });
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/budgets")
                .header(USER_ID_HEADER, &external_id)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Report API Tests ==========

#[tokio::test]
async fn test_current_report_empty_month_uses_sample() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/current")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["stats"]["totalIncome"], 5800.0);
    assert_eq!(json["stats"]["totalExpenses"], 3700.0);
    assert_eq!(json["insights"].as_array().unwrap().len(), 3);
    assert!(json["month"].as_str().unwrap().len() > 2);
}

#[tokio::test]
async fn test_current_report_aggregates_month_data() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let user = db.get_user_by_external_id(&external_id).unwrap().unwrap();
    let account_id = db.create_account(user.id, "Checking", true).unwrap();

    let today = chrono::Utc::now().date_naive();
    db.insert_transaction(
        account_id,
        &NewTransaction {
            kind: TransactionKind::Income,
            category: Some("Salary".into()),
            amount: 4200.0,
            date: today,
            description: None,
        },
    )
    .unwrap();
    db.insert_transaction(
        account_id,
        &NewTransaction {
            kind: TransactionKind::Expense,
            category: Some("Housing".into()),
            amount: 1500.0,
            date: today,
            description: None,
        },
    )
    .unwrap();

    let app = setup_app_with(db, MockMailer::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/current")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["stats"]["totalIncome"], 4200.0);
    assert_eq!(json["stats"]["totalExpenses"], 1500.0);
    assert_eq!(json["stats"]["byCategory"]["Housing"], 1500.0);
}

#[tokio::test]
async fn test_generate_report_success() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let mailer = MockMailer::new();
    let app = setup_app_with(db, mailer.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/generate")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Report generated and sent to your email");

    assert_eq!(mailer.sent_count(), 1);
    assert_eq!(mailer.last_recipient().as_deref(), Some("ada@example.com"));
    let subject = mailer.last_subject().unwrap();
    assert!(subject.starts_with("Your On-Demand Financial Report - "));
}

#[tokio::test]
async fn test_generate_report_without_email() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let mailer = MockMailer::new();
    let app = setup_app_with(db, mailer.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/generate")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "No email address found for your account");
    // Nothing went out
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_generate_report_delivery_failure() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let app = setup_app_with(db, MockMailer::failing());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/generate")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Email sending failed"));
}

#[tokio::test]
async fn test_send_test_report_with_explicit_recipient() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, None);
    let mailer = MockMailer::new();
    let app = setup_app_with(db, mailer.clone());

    let body = serde_json::json!({ "to": "demo@example.com", "name": "Demo" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/test")
                .header(USER_ID_HEADER, &external_id)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(mailer.sent_count(), 1);
    assert_eq!(mailer.last_recipient().as_deref(), Some("demo@example.com"));
}

#[tokio::test]
async fn test_send_test_report_defaults_to_caller_email() {
    let db = Database::in_memory().unwrap();
    let external_id = seed_user(&db, Some("ada@example.com"));
    let mailer = MockMailer::new();
    let app = setup_app_with(db, mailer.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/test")
                .header(USER_ID_HEADER, &external_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mailer.last_recipient().as_deref(), Some("ada@example.com"));
}
