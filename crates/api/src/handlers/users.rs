//! Handlers for the `/users` resource (registration, profile, password reset).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use gatehouse_core::error::CoreError;
use gatehouse_core::session::generate_reset_token;
use gatehouse_db::models::user::CreateUser;
use gatehouse_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::gate::CurrentUser;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /reset_password`.
#[derive(Debug, Deserialize)]
pub struct ResetTokenRequest {
    pub email: String,
}

/// Request body for `PUT /reset_password`.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

/// POST /api/v1/users
///
/// Register a new user. A duplicate email is an explicit conflict; a failed
/// attempt leaves the stored record untouched.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    // 1. Validate input.
    if input.email.is_empty() {
        return Err(AppError::BadRequest("email missing".into()));
    }
    if input.password.is_empty() {
        return Err(AppError::BadRequest("password missing".into()));
    }

    // 2. Reject an email that is already registered. (A racing insert is
    //    still caught by the unique constraint and classified as 409.)
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "email already registered".into(),
        )));
    }

    // 3. Hash the password and store the user.
    let password_hash = hash_password(&input.password)
        .map_err(|err| AppError::InternalError(format!("Password hashing error: {err}")))?;

    let input = CreateUser {
        email: input.email,
        password_hash,
    };
    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "email": user.email, "message": "user created" })),
    ))
}

/// GET /api/v1/profile
///
/// The authenticated user's profile.
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "email": user.email }))
}

/// POST /api/v1/reset_password
///
/// Issue a one-time reset token for the given email. An unregistered email
/// is forbidden rather than silently accepted.
pub async fn request_reset_token(
    State(state): State<AppState>,
    Json(input): Json<ResetTokenRequest>,
) -> AppResult<Json<Value>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Forbidden("email not registered".into())))?;

    let token = generate_reset_token();
    UserRepo::set_reset_token(&state.pool, user.id, &token).await?;

    tracing::info!(user_id = user.id, "reset token issued");

    Ok(Json(json!({ "email": user.email, "reset_token": token })))
}

/// PUT /api/v1/reset_password
///
/// Consume a reset token and set a new password. The token is single-use:
/// updating the password clears it, along with any recorded session.
pub async fn update_password(
    State(state): State<AppState>,
    Json(input): Json<UpdatePasswordRequest>,
) -> AppResult<Json<Value>> {
    let user = UserRepo::find_by_reset_token(&state.pool, &input.reset_token)
        .await?
        .filter(|user| user.email == input.email)
        .ok_or_else(|| AppError::Core(CoreError::Forbidden("invalid reset token".into())))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|err| AppError::InternalError(format!("Password hashing error: {err}")))?;

    // Any active session stops resolving once the password changes.
    if let Some(session_id) = &user.session_id {
        state.sessions.destroy(session_id).await;
    }

    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "password updated");

    Ok(Json(
        json!({ "email": user.email, "message": "Password updated" }),
    ))
}
