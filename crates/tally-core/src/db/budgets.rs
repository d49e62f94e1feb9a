//! Budget operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Budget, BudgetStatus};
use crate::report::month_range;

impl Database {
    /// Create or replace the monthly budget for an account
    pub fn set_budget(&self, account_id: i64, amount: f64) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO budgets (account_id, amount) VALUES (?, ?)
             ON CONFLICT(account_id) DO UPDATE SET amount = excluded.amount",
            params![account_id, amount],
        )?;

        let id: i64 = conn.query_row(
            "SELECT id FROM budgets WHERE account_id = ?",
            params![account_id],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// Get the budget for an account, if one is set
    pub fn get_budget(&self, account_id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;

        let budget = conn
            .query_row(
                "SELECT id, account_id, amount, created_at FROM budgets WHERE account_id = ?",
                params![account_id],
                |row| {
                    let created_at_str: String = row.get(3)?;
                    Ok(Budget {
                        id: row.get(0)?,
                        account_id: row.get(1)?,
                        amount: row.get(2)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;

        Ok(budget)
    }

    /// Budget usage for a user's default account in the month containing `today`
    ///
    /// Returns None when the user has no default account or no budget set.
    pub fn budget_status(&self, user_id: i64, today: NaiveDate) -> Result<Option<BudgetStatus>> {
        let account = match self.get_default_account(user_id)? {
            Some(a) => a,
            None => return Ok(None),
        };

        let budget = match self.get_budget(account.id)? {
            Some(b) => b,
            None => return Ok(None),
        };

        let (from, to) = month_range(today);
        let current_expenses = self.account_expenses_in_range(account.id, from, to)?;

        Ok(Some(BudgetStatus {
            budget,
            current_expenses,
        }))
    }
}
