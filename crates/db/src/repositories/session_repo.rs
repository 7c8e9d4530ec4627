//! Repository for the `user_sessions` table.

use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "session_id, user_id, created_at";

/// Provides row-level operations for durable sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session row, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (session_id, user_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(&input.session_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a session row by its token.
    ///
    /// Returns the row regardless of age; expiry is the registry's call.
    pub async fn find_by_session_id(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE session_id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a session row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, session_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
