//! Request gate: path exemptions and credential enforcement.
//!
//! Every request outside the exempted paths must carry either an
//! `Authorization` header or a session cookie. A request with no credential
//! at all is rejected as unauthenticated (401); a credential that resolves
//! to no known identity is rejected as forbidden (403) -- two distinct
//! error classes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use gatehouse_core::error::CoreError;
use gatehouse_db::models::user::User;
use gatehouse_db::repositories::UserRepo;

use crate::auth::basic;
use crate::error::AppError;
use crate::state::AppState;

/// Paths reachable without authentication.
///
/// An entry ending in `*` is a prefix exemption; everything else matches
/// the exact path, with or without a trailing slash.
pub const EXEMPT_PATHS: &[&str] = &[
    "/health",
    "/api/v1/status/",
    "/api/v1/stats/",
    "/api/v1/users/",
    "/api/v1/auth_session/login/",
    "/api/v1/reset_password*",
];

/// Whether `path` requires authentication given the exemption list.
///
/// Matching is tolerant of a trailing slash on either side. An empty path
/// or an empty exemption list always requires authentication.
pub fn requires_auth(path: &str, exempt_paths: &[&str]) -> bool {
    if path.is_empty() || exempt_paths.is_empty() {
        return true;
    }
    let path = path.trim_end_matches('/');
    for exempt in exempt_paths {
        if let Some(prefix) = exempt.strip_suffix('*') {
            if path.starts_with(prefix) {
                return false;
            }
        } else if path == exempt.trim_end_matches('/') {
            return false;
        }
    }
    true
}

/// Extract the session cookie value from the request headers.
pub fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

/// Authenticated user attached to the request by the gate middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing credentials".into()))
        })
    }
}

/// Axum middleware enforcing the gate on every non-exempt request.
///
/// On success the resolved [`CurrentUser`] is inserted into the request
/// extensions for handlers to extract.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !requires_auth(request.uri().path(), EXEMPT_PATHS) {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let cookie = session_cookie(request.headers(), &state.config.session.cookie_name);

    // No credential that could identify anyone: unauthenticated.
    if auth_header.is_none() && cookie.is_none() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Missing credentials".into(),
        )));
    }

    // Credential present but no identity behind it: forbidden.
    let Some(user) = identify(&state, auth_header.as_deref(), cookie.as_deref()).await else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Credentials do not resolve to a user".into(),
        )));
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Resolve a user from whichever credential the request carried.
///
/// The Authorization header takes precedence; otherwise the session cookie
/// is resolved through the active registry.
async fn identify(
    state: &AppState,
    auth_header: Option<&str>,
    cookie: Option<&str>,
) -> Option<User> {
    if let Some(header) = auth_header {
        let (email, password) = basic::parse_basic_authorization(header)?;
        return basic::user_from_credentials(&state.pool, &email, &password).await;
    }

    let session_id = cookie?;
    let user_id = state.sessions.resolve(session_id).await?;
    match UserRepo::find_by_id(&state.pool, user_id).await {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(error = %err, "user lookup for session failed");
            None
        }
    }
}
