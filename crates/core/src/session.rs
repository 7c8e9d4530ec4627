//! Session registry: opaque token issuance, resolution, and destruction.
//!
//! A session id has three observable states: absent, active, and expired.
//! Expiry is governed by a [`SessionTtl`] policy; a TTL of zero or below
//! disables it. Implementations are swappable behind the [`SessionRegistry`]
//! trait: the in-memory [`MemoryRegistry`] here, and the Postgres-backed
//! registry in the db crate. Which one a process uses is decided once at
//! startup by configuration.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::types::{DbId, Timestamp};

/// Length of a generated session token (alphanumeric characters).
///
/// 32 alphanumeric characters carry roughly 190 bits of randomness, so
/// collision probability between independently issued tokens is negligible.
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Generate a fresh opaque session token.
pub fn generate_session_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Generate a one-time password-reset token (UUID v4 string).
pub fn generate_reset_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// TTL policy
// ---------------------------------------------------------------------------

/// Session expiration policy, built from the configured TTL in seconds.
///
/// A TTL of zero or below disables expiration entirely. This type owns the
/// only `created_at + ttl` versus `now` comparison in the codebase.
#[derive(Debug, Clone, Copy)]
pub struct SessionTtl {
    seconds: i64,
}

impl SessionTtl {
    /// Build a policy from seconds; `<= 0` means sessions never expire.
    pub fn from_secs(seconds: i64) -> Self {
        Self { seconds }
    }

    /// A policy under which sessions never expire.
    pub fn never() -> Self {
        Self { seconds: 0 }
    }

    /// Whether a session created at `created_at` is expired at `now`.
    pub fn is_expired(&self, created_at: Timestamp, now: Timestamp) -> bool {
        self.seconds > 0 && now > created_at + Duration::seconds(self.seconds)
    }
}

// ---------------------------------------------------------------------------
// Registry trait
// ---------------------------------------------------------------------------

/// A registry mapping active session ids to user ids.
///
/// All operations fail soft: bad input and storage trouble surface as
/// `None`/`false`, never as an error or a panic, so callers at the HTTP
/// boundary stay fail-closed.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Issue a new session for `user_id`.
    ///
    /// Returns `None` for non-identifying user ids (`<= 0`) and on storage
    /// failure.
    async fn create(&self, user_id: DbId) -> Option<String>;

    /// Resolve a session id to its user id.
    ///
    /// Returns `None` if the id was never issued, was destroyed, or has
    /// outlived the registry's TTL. A destroyed or expired id never
    /// resolves again.
    async fn resolve(&self, session_id: &str) -> Option<DbId>;

    /// Destroy a session.
    ///
    /// Returns `true` and removes the entry iff it exists; a second call
    /// with the same id returns `false` and has no effect.
    async fn destroy(&self, session_id: &str) -> bool;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: DbId,
    created_at: Timestamp,
}

/// In-memory session registry.
///
/// Constructor-owned state, no globals: whoever builds the registry decides
/// its lifetime (in practice the application state, for the life of the
/// process). The mutex makes individual operations atomic; nothing more is
/// promised under concurrent mutation.
pub struct MemoryRegistry {
    ttl: SessionTtl,
    entries: Mutex<HashMap<String, SessionEntry>>,
}

impl MemoryRegistry {
    pub fn new(ttl: SessionTtl) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Rewrite an entry's creation time, for expiry tests.
    #[cfg(test)]
    fn backdate(&self, session_id: &str, created_at: Timestamp) {
        let mut entries = self.entries.lock().expect("session map poisoned");
        if let Some(entry) = entries.get_mut(session_id) {
            entry.created_at = created_at;
        }
    }
}

#[async_trait]
impl SessionRegistry for MemoryRegistry {
    async fn create(&self, user_id: DbId) -> Option<String> {
        if user_id <= 0 {
            return None;
        }
        let token = generate_session_token();
        let entry = SessionEntry {
            user_id,
            created_at: Utc::now(),
        };
        let Ok(mut entries) = self.entries.lock() else {
            return None;
        };
        entries.insert(token.clone(), entry);
        Some(token)
    }

    async fn resolve(&self, session_id: &str) -> Option<DbId> {
        if session_id.is_empty() {
            return None;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return None;
        };
        let entry = entries.get(session_id)?.clone();
        if self.ttl.is_expired(entry.created_at, Utc::now()) {
            // Evict on sight so the id can never resolve again.
            entries.remove(session_id);
            return None;
        }
        Some(entry.user_id)
    }

    async fn destroy(&self, session_id: &str) -> bool {
        if session_id.is_empty() {
            return false;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return false;
        };
        entries.remove(session_id).is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
