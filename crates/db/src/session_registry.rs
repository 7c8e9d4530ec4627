//! Durable session registry backed by the `user_sessions` table.

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use gatehouse_core::session::{generate_session_token, SessionRegistry, SessionTtl};
use gatehouse_core::types::DbId;

use crate::models::session::CreateSession;
use crate::repositories::SessionRepo;
use crate::DbPool;

/// Session registry whose entries are rows in `user_sessions`.
///
/// Storage failures never propagate: lookups degrade to "not found" and
/// mutations report no effect, with a warning in the log. The entry's
/// stored `created_at` is checked against the same [`SessionTtl`] policy
/// the in-memory registry uses.
pub struct PgSessionRegistry {
    pool: DbPool,
    ttl: SessionTtl,
}

impl PgSessionRegistry {
    pub fn new(pool: DbPool, ttl: SessionTtl) -> Self {
        Self { pool, ttl }
    }
}

#[async_trait]
impl SessionRegistry for PgSessionRegistry {
    async fn create(&self, user_id: DbId) -> Option<String> {
        if user_id <= 0 {
            return None;
        }
        let input = CreateSession {
            session_id: generate_session_token(),
            user_id,
        };
        match SessionRepo::create(&self.pool, &input).await {
            Ok(row) => Some(row.session_id),
            Err(err) => {
                warn!(user_id, error = %err, "failed to persist session");
                None
            }
        }
    }

    async fn resolve(&self, session_id: &str) -> Option<DbId> {
        if session_id.is_empty() {
            return None;
        }
        let row = match SessionRepo::find_by_session_id(&self.pool, session_id).await {
            Ok(row) => row?,
            Err(err) => {
                warn!(error = %err, "session lookup failed");
                return None;
            }
        };
        if self.ttl.is_expired(row.created_at, Utc::now()) {
            // Evict on sight so the id can never resolve again.
            if let Err(err) = SessionRepo::delete(&self.pool, session_id).await {
                warn!(error = %err, "failed to evict expired session");
            }
            return None;
        }
        Some(row.user_id)
    }

    async fn destroy(&self, session_id: &str) -> bool {
        if session_id.is_empty() {
            return false;
        }
        match SessionRepo::delete(&self.pool, session_id).await {
            Ok(deleted) => deleted,
            Err(err) => {
                warn!(error = %err, "session delete failed");
                false
            }
        }
    }
}
