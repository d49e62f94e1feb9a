//! Database tests

use chrono::NaiveDate;

use super::*;
use crate::models::{NewTransaction, TransactionKind};

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_user_lookup_roundtrip() {
    let db = Database::in_memory().unwrap();

    let id = db
        .create_user("ext-42", "Ada Lovelace", Some("ada@example.com"))
        .unwrap();
    assert!(id > 0);

    let user = db.get_user_by_external_id("ext-42").unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));

    assert!(db.get_user_by_external_id("nobody").unwrap().is_none());
}

#[test]
fn test_set_user_email() {
    let db = Database::in_memory().unwrap();
    let id = db.create_user("ext-1", "Ada", None).unwrap();

    db.set_user_email(id, Some("ada@example.com")).unwrap();
    let user = db.get_user_by_external_id("ext-1").unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));

    db.set_user_email(id, None).unwrap();
    let user = db.get_user_by_external_id("ext-1").unwrap().unwrap();
    assert!(user.email.is_none());

    assert!(db.set_user_email(9999, Some("x@y.com")).is_err());
}

#[test]
fn test_default_account_is_exclusive() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ext-1", "Ada", None).unwrap();

    let first = db.create_account(user_id, "Checking", true).unwrap();
    let second = db.create_account(user_id, "Savings", true).unwrap();

    let default = db.get_default_account(user_id).unwrap().unwrap();
    assert_eq!(default.id, second);

    let accounts = db.list_accounts(user_id).unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts.iter().filter(|a| a.is_default).count(), 1);
    assert!(accounts.iter().any(|a| a.id == first && !a.is_default));
}

#[test]
fn test_transactions_in_range() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ext-1", "Ada", None).unwrap();
    let account_id = db.create_account(user_id, "Checking", true).unwrap();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let insert = |kind, category: Option<&str>, amount, when| {
        db.insert_transaction(
            account_id,
            &NewTransaction {
                kind,
                category: category.map(String::from),
                amount,
                date: when,
                description: None,
            },
        )
        .unwrap()
    };

    insert(TransactionKind::Income, Some("Salary"), 5000.0, date(2026, 8, 1));
    insert(TransactionKind::Expense, Some("Food"), 100.0, date(2026, 8, 10));
    insert(TransactionKind::Expense, Some("Food"), 50.0, date(2026, 7, 31));
    insert(TransactionKind::Expense, None, 25.0, date(2026, 8, 31));

    let august = db
        .transactions_in_range(user_id, date(2026, 8, 1), date(2026, 8, 31))
        .unwrap();
    assert_eq!(august.len(), 3);
    assert_eq!(august[0].kind, TransactionKind::Income);
    assert_eq!(august[2].category, None);

    let expenses = db
        .account_expenses_in_range(account_id, date(2026, 8, 1), date(2026, 8, 31))
        .unwrap();
    assert_eq!(expenses, 125.0);
}

#[test]
fn test_negative_amount_rejected() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ext-1", "Ada", None).unwrap();
    let account_id = db.create_account(user_id, "Checking", true).unwrap();

    let result = db.insert_transaction(
        account_id,
        &NewTransaction {
            kind: TransactionKind::Expense,
            category: None,
            amount: -5.0,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            description: None,
        },
    );
    assert!(result.is_err());
}

#[test]
fn test_budget_upsert_and_status() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ext-1", "Ada", None).unwrap();
    let account_id = db.create_account(user_id, "Checking", true).unwrap();

    let first = db.set_budget(account_id, 3000.0).unwrap();
    let second = db.set_budget(account_id, 4000.0).unwrap();
    assert_eq!(first, second);

    let budget = db.get_budget(account_id).unwrap().unwrap();
    assert_eq!(budget.amount, 4000.0);

    let today = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
    db.insert_transaction(
        account_id,
        &NewTransaction {
            kind: TransactionKind::Expense,
            category: Some("Food".into()),
            amount: 120.0,
            date: today,
            description: None,
        },
    )
    .unwrap();

    let status = db.budget_status(user_id, today).unwrap().unwrap();
    assert_eq!(status.budget.amount, 4000.0);
    assert_eq!(status.current_expenses, 120.0);
}

#[test]
fn test_budget_status_requires_default_account() {
    let db = Database::in_memory().unwrap();
    let user_id = db.create_user("ext-1", "Ada", None).unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
    assert!(db.budget_status(user_id, today).unwrap().is_none());

    // Account without a budget still yields None
    db.create_account(user_id, "Checking", true).unwrap();
    assert!(db.budget_status(user_id, today).unwrap().is_none());
}

#[test]
fn test_seed_demo_data_is_idempotent() {
    let db = Database::in_memory().unwrap();

    let first = db.seed_demo_data().unwrap();
    let second = db.seed_demo_data().unwrap();
    assert_eq!(first, second);

    let user = db.get_user_by_external_id("demo-user").unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("demo@example.com"));
    assert!(db.count_transactions().unwrap() >= 10);

    let accounts = db.list_accounts(user.id).unwrap();
    assert_eq!(accounts.len(), 1);
    assert!(db.get_budget(accounts[0].id).unwrap().is_some());
}

#[test]
fn test_recent_transactions_ordering() {
    let db = Database::in_memory().unwrap();
    let user_id = db.seed_demo_data().unwrap();

    let recent = db.list_recent_transactions(user_id, 5).unwrap();
    assert_eq!(recent.len(), 5);
    for pair in recent.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
}
