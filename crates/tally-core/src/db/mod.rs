//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - User lookup and creation
//! - `accounts` - Account operations
//! - `transactions` - Transaction insert and period queries
//! - `budgets` - Monthly budget get/set and usage

use chrono::{DateTime, Datelike, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;
use crate::models::{NewTransaction, TransactionKind};

mod accounts;
mod budgets;
mod transactions;
mod users;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create an in-memory database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!("/tmp/tally_test_{}_{}.db", std::process::id(), id);

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Users (identity mirrored from the external provider)
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                external_id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                email TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_users_external ON users(external_id);

            -- Accounts
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                is_default BOOLEAN DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, name)
            );

            CREATE INDEX IF NOT EXISTS idx_accounts_user ON accounts(user_id);

            -- Transactions
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL REFERENCES accounts(id),
                kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
                category TEXT,
                amount REAL NOT NULL,
                date DATE NOT NULL,
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_kind ON transactions(kind);

            -- Budgets (one monthly budget per account)
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL UNIQUE REFERENCES accounts(id),
                amount REAL NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        Ok(())
    }

    /// Insert a demo user with an account, a month of transactions, and a
    /// budget. Returns the user id. Intended for `tally seed` and local
    /// development; idempotent per external id.
    pub fn seed_demo_data(&self) -> Result<i64> {
        if let Some(user) = self.get_user_by_external_id("demo-user")? {
            info!("Demo user already seeded (id={})", user.id);
            return Ok(user.id);
        }

        let user_id = self.create_user("demo-user", "Demo User", Some("demo@example.com"))?;
        let account_id = self.create_account(user_id, "Everyday Checking", true)?;
        self.set_budget(account_id, 4000.0)?;

        let today = Utc::now().date_naive();
        let first = today.with_day(1).unwrap_or(today);
        let day = |d: u32| first.with_day(d.min(today.day())).unwrap_or(first);

        let demo: [(TransactionKind, Option<&str>, f64, u32, &str); 10] = [
            (TransactionKind::Income, Some("Salary"), 5200.0, 1, "Monthly salary"),
            (TransactionKind::Income, None, 300.0, 12, "Marketplace sale"),
            (TransactionKind::Expense, Some("Housing"), 1400.0, 2, "Rent"),
            (TransactionKind::Expense, Some("Food"), 82.50, 4, "Groceries"),
            (TransactionKind::Expense, Some("Food"), 46.10, 11, "Groceries"),
            (TransactionKind::Expense, Some("Transportation"), 60.0, 5, "Fuel"),
            (TransactionKind::Expense, Some("Entertainment"), 15.99, 7, "Streaming"),
            (TransactionKind::Expense, Some("Utilities"), 130.0, 8, "Electricity"),
            (TransactionKind::Expense, Some("Shopping"), 220.0, 9, "Clothing"),
            (TransactionKind::Expense, None, 25.0, 10, "Cash withdrawal"),
        ];

        for (kind, category, amount, d, description) in demo {
            self.insert_transaction(
                account_id,
                &NewTransaction {
                    kind,
                    category: category.map(|c| c.to_string()),
                    amount,
                    date: day(d),
                    description: Some(description.to_string()),
                },
            )?;
        }

        info!("Seeded demo data (user id={})", user_id);
        Ok(user_id)
    }
}
