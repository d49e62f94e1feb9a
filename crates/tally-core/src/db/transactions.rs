//! Transaction operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionKind};

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(2)?;
    let date_str: String = row.get(5)?;
    let created_at_str: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        kind: kind_str.parse::<TransactionKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            )
        })?,
        category: row.get(3)?,
        amount: row.get(4)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        description: row.get(6)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const TX_COLUMNS: &str =
    "t.id, t.account_id, t.kind, t.category, t.amount, t.date, t.description, t.created_at";

impl Database {
    /// Insert a transaction
    pub fn insert_transaction(&self, account_id: i64, tx: &NewTransaction) -> Result<i64> {
        if tx.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Transaction amount must be non-negative, got {}",
                tx.amount
            )));
        }

        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO transactions (account_id, kind, category, amount, date, description)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                account_id,
                tx.kind.as_str(),
                tx.category,
                tx.amount,
                tx.date.to_string(),
                tx.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's most recent transactions across all accounts
    pub fn list_recent_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TX_COLUMNS} FROM transactions t
             JOIN accounts a ON a.id = t.account_id
             WHERE a.user_id = ?
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?"
        ))?;

        let txs = stmt
            .query_map(params![user_id, limit], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(txs)
    }

    /// Load a user's transactions within a date range (inclusive)
    pub fn transactions_in_range(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TX_COLUMNS} FROM transactions t
             JOIN accounts a ON a.id = t.account_id
             WHERE a.user_id = ? AND t.date >= ? AND t.date <= ?
             ORDER BY t.date, t.id"
        ))?;

        let txs = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(txs)
    }

    /// Sum of EXPENSE amounts for one account within a date range
    pub fn account_expenses_in_range(
        &self,
        account_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;

        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions
             WHERE account_id = ? AND kind = 'EXPENSE' AND date >= ? AND date <= ?",
            params![account_id, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;

        Ok(total)
    }

    /// Count of all transactions (for `tally status`)
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}
