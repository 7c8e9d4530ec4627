//! Repository for the `users` table.

use gatehouse_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, session_id, reset_token, created_at, updated_at";

/// Provides point lookups and narrow mutations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email surfaces as a unique-constraint violation
    /// (`uq_users_email`) from sqlx; classification happens at the API layer.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the user whose row records the given session token.
    pub async fn find_by_session_id(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE session_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the user holding the given password-reset token.
    pub async fn find_by_reset_token(
        pool: &PgPool,
        reset_token: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE reset_token = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(reset_token)
            .fetch_optional(pool)
            .await
    }

    /// Count all registered users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Record the user's current session token. Returns `true` if the row
    /// was updated.
    pub async fn set_session(
        pool: &PgPool,
        id: DbId,
        session_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET session_id = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(session_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the user's recorded session token. Returns `true` if a token
    /// was actually cleared.
    pub async fn clear_session(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET session_id = NULL, updated_at = now()
             WHERE id = $1 AND session_id IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a one-time password-reset token on the user's row.
    pub async fn set_reset_token(
        pool: &PgPool,
        id: DbId,
        reset_token: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET reset_token = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(reset_token)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the user's password hash, consuming any reset token and
    /// recorded session in the same statement. Returns `true` if the row
    /// was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                reset_token = NULL,
                session_id = NULL,
                updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
