//! Session row model and DTOs.

use gatehouse_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub session_id: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for inserting a new session row.
pub struct CreateSession {
    pub session_id: String,
    pub user_id: DbId,
}
