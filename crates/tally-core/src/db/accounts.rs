//! Account operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::Account;

impl Database {
    /// Create an account for a user
    ///
    /// Marking an account as default clears the flag on the user's other
    /// accounts; the dashboard and budget always resolve exactly one default.
    pub fn create_account(&self, user_id: i64, name: &str, is_default: bool) -> Result<i64> {
        let conn = self.conn()?;

        if is_default {
            conn.execute(
                "UPDATE accounts SET is_default = 0 WHERE user_id = ?",
                params![user_id],
            )?;
        }

        conn.execute(
            "INSERT INTO accounts (user_id, name, is_default) VALUES (?, ?, ?)",
            params![user_id, name, is_default],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's accounts
    pub fn list_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, is_default, created_at FROM accounts
             WHERE user_id = ? ORDER BY is_default DESC, name",
        )?;

        let accounts = stmt
            .query_map(params![user_id], |row| {
                let created_at_str: String = row.get(4)?;
                Ok(Account {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                    is_default: row.get(3)?,
                    created_at: parse_datetime(&created_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    /// Total number of accounts
    pub fn count_accounts(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get the user's default account, if any
    pub fn get_default_account(&self, user_id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;

        let account = conn
            .query_row(
                "SELECT id, user_id, name, is_default, created_at FROM accounts
                 WHERE user_id = ? AND is_default = 1",
                params![user_id],
                |row| {
                    let created_at_str: String = row.get(4)?;
                    Ok(Account {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        is_default: row.get(3)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;

        Ok(account)
    }
}
