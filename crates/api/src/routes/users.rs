//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// POST /users           -> register (public)
/// GET  /profile         -> current user's profile (requires auth)
/// POST /reset_password  -> request a reset token (public)
/// PUT  /reset_password  -> update password with a reset token (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register))
        .route("/profile", get(users::profile))
        .route(
            "/reset_password",
            post(users::request_reset_token).put(users::update_password),
        )
}
