//! Route definitions for status and stats.

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET /status  -> service status
/// GET /stats   -> object counts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::status))
        .route("/stats", get(status::stats))
}
