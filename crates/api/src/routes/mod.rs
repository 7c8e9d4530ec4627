pub mod auth;
pub mod health;
pub mod status;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /status                      service status (public)
/// /stats                       object counts (public)
///
/// /users                       registration (public)
/// /profile                     current user's profile
/// /reset_password              request token (POST), update password (PUT) (public)
///
/// /auth_session/login          session login (public)
/// /auth_session/logout         session logout (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(status::router())
        .merge(users::router())
        .merge(auth::router())
}
