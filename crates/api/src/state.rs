use std::sync::Arc;

use gatehouse_core::session::SessionRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gatehouse_db::DbPool,
    /// Server configuration (accessed by the gate middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Active session registry, selected at startup by configuration.
    pub sessions: Arc<dyn SessionRegistry>,
}
