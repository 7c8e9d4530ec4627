//! Handlers for the session-auth resource (login, logout).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use gatehouse_core::error::CoreError;
use gatehouse_core::redact::{redact_fields, PII_FIELDS, REDACTION, SEPARATOR};
use gatehouse_db::models::user::UserResponse;
use gatehouse_db::repositories::UserRepo;

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::gate;
use crate::state::AppState;

/// Request body for `POST /auth_session/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth_session/login
///
/// Verify credentials, issue a session through the active registry, record
/// it on the user row (single-session model), and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    // 1. Validate input.
    if input.email.is_empty() {
        return Err(AppError::BadRequest("email missing".into()));
    }
    if input.password.is_empty() {
        return Err(AppError::BadRequest("password missing".into()));
    }

    tracing::info!(
        payload = %redact_fields(
            &PII_FIELDS,
            REDACTION,
            &format!("email={};password={};", input.email, input.password),
            SEPARATOR,
        ),
        "login attempt"
    );

    // 2. Find the user by email.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound("no user found for this email".into()))
        })?;

    // 3. Verify the password.
    if !verify_password(&input.password, &user.password_hash) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "wrong password".into(),
        )));
    }

    // 4. Single-session model: drop any previous session before issuing a
    //    new one, so the overwritten token stops resolving.
    if let Some(old_session) = &user.session_id {
        state.sessions.destroy(old_session).await;
    }

    let session_id = state
        .sessions
        .create(user.id)
        .await
        .ok_or_else(|| AppError::InternalError("failed to create session".into()))?;

    // 5. Record it on the user row; a new login overwrites the old token.
    UserRepo::set_session(&state.pool, user.id, &session_id).await?;

    tracing::info!(user_id = user.id, "login successful");

    // 6. Return the safe user payload with the session cookie set.
    let cookie = format!(
        "{}={}; Path=/; HttpOnly",
        state.config.session.cookie_name, session_id
    );
    let cookie = cookie
        .parse()
        .map_err(|_| AppError::InternalError("session cookie is not a valid header".into()))?;

    let mut response = Json(UserResponse::from(&user)).into_response();
    response.headers_mut().insert(SET_COOKIE, cookie);
    Ok(response)
}

/// DELETE /api/v1/auth_session/logout
///
/// Destroy the session identified by the request cookie. Returns 404 when
/// there is nothing to destroy.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Value>> {
    let session_id = gate::session_cookie(&headers, &state.config.session.cookie_name)
        .ok_or_else(|| AppError::Core(CoreError::NotFound("no active session".into())))?;

    // Resolve first so the owning user row can be cleared afterwards.
    let user_id = state.sessions.resolve(&session_id).await;

    if !state.sessions.destroy(&session_id).await {
        return Err(AppError::Core(CoreError::NotFound(
            "no active session".into(),
        )));
    }

    if let Some(user_id) = user_id {
        UserRepo::clear_session(&state.pool, user_id).await?;
        tracing::info!(user_id, "logout successful");
    }

    Ok(Json(json!({})))
}
