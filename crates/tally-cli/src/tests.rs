//! CLI command tests

use tempfile::TempDir;

use crate::commands;

/// Temp directory plus the database path inside it
fn setup_test_db_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tally.db");
    (dir, path)
}

#[test]
fn test_cmd_init_creates_database() {
    let (_dir, path) = setup_test_db_path();

    let result = commands::cmd_init(&path);
    assert!(result.is_ok());
    assert!(path.exists());
}

#[test]
fn test_cmd_init_is_idempotent() {
    let (_dir, path) = setup_test_db_path();

    commands::cmd_init(&path).unwrap();
    let result = commands::cmd_init(&path);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_seed_creates_demo_user() {
    let (_dir, path) = setup_test_db_path();

    commands::cmd_init(&path).unwrap();
    commands::cmd_seed(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    let user = db.get_user_by_external_id("demo-user").unwrap();
    assert!(user.is_some());
    assert!(db.count_transactions().unwrap() > 0);
}

#[test]
fn test_cmd_seed_twice_does_not_duplicate() {
    let (_dir, path) = setup_test_db_path();

    commands::cmd_seed(&path).unwrap();
    let db = commands::open_db(&path).unwrap();
    let count = db.count_transactions().unwrap();

    commands::cmd_seed(&path).unwrap();
    assert_eq!(db.count_transactions().unwrap(), count);
}

#[tokio::test]
async fn test_cmd_report_without_user_fails() {
    let (_dir, path) = setup_test_db_path();
    commands::cmd_init(&path).unwrap();

    let result = commands::cmd_report(&path, "nobody", false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_report_prints_seeded_month() {
    let (_dir, path) = setup_test_db_path();
    commands::cmd_seed(&path).unwrap();

    let result = commands::cmd_report(&path, "demo-user", false).await;
    assert!(result.is_ok());
}

#[test]
fn test_cmd_status_on_missing_database() {
    let (_dir, path) = setup_test_db_path();

    // Status must not fail before the database exists
    let result = commands::cmd_status(&path);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_status_with_data() {
    let (_dir, path) = setup_test_db_path();
    commands::cmd_seed(&path).unwrap();

    let result = commands::cmd_status(&path);
    assert!(result.is_ok());
}
