//! Route definitions for the session-auth resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth_session`.
///
/// ```text
/// POST   /auth_session/login   -> login (public)
/// DELETE /auth_session/logout  -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth_session/login", post(auth::login))
        .route("/auth_session/logout", delete(auth::logout))
}
