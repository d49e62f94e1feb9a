//! User operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::User;

impl Database {
    /// Create a user mirrored from the external identity provider
    pub fn create_user(
        &self,
        external_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO users (external_id, name, email) VALUES (?, ?, ?)",
            params![external_id, name, email],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Look up a user by the identity provider's identifier
    pub fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let conn = self.conn()?;

        let user = conn
            .query_row(
                "SELECT id, external_id, name, email, created_at FROM users WHERE external_id = ?",
                params![external_id],
                |row| {
                    let created_at_str: String = row.get(4)?;
                    Ok(User {
                        id: row.get(0)?,
                        external_id: row.get(1)?,
                        name: row.get(2)?,
                        email: row.get(3)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Total number of users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update a user's email address (None clears it)
    pub fn set_user_email(&self, user_id: i64, email: Option<&str>) -> Result<()> {
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE users SET email = ? WHERE id = ?",
            params![email, user_id],
        )?;

        if updated == 0 {
            return Err(crate::error::Error::NotFound(format!(
                "User {} not found",
                user_id
            )));
        }

        Ok(())
    }
}
