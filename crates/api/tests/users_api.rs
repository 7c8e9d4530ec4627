//! HTTP-level integration tests for registration, stats, and the
//! password-reset flow.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    body_json, build_test_app, cookie_header, get, post_json, request, session_cookie_from,
    COOKIE_NAME,
};
use sqlx::PgPool;

/// Log in through the API, asserting the expected status, and return the
/// session cookie when the login succeeded.
async fn try_login(app: &Router, email: &str, password: &str, expect: StatusCode) -> Option<String> {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app.clone(), "/api/v1/auth_session/login", body).await;
    assert_eq!(response.status(), expect);
    session_cookie_from(&response, COOKIE_NAME)
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registering a new email succeeds with the documented payload.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "bob@example.com", "password": "b4l0u" });
    let response = post_json(app, "/api/v1/users", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "bob@example.com");
    assert_eq!(json["message"], "user created");
}

/// Registering the same email twice: the second attempt conflicts and the
/// stored record is unchanged -- the original password still logs in.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email_is_a_conflict(pool: PgPool) {
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "bob@example.com", "password": "first-password" });
    let response = post_json(app.clone(), "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = serde_json::json!({ "email": "bob@example.com", "password": "other-password" });
    let response = post_json(app.clone(), "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "email already registered");

    // The first registration's password is still the one on record.
    try_login(&app, "bob@example.com", "first-password", StatusCode::OK).await;
    try_login(
        &app,
        "bob@example.com",
        "other-password",
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

/// Empty email or password is rejected before touching the database.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_missing_fields_is_400(pool: PgPool) {
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "", "password": "pw" });
    let response = post_json(app.clone(), "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "email": "bob@example.com", "password": "" });
    let response = post_json(app, "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The stats endpoint reports the number of registered users.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_counts_users(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["users"], 0);

    let body = serde_json::json!({ "email": "bob@example.com", "password": "pw123" });
    post_json(app.clone(), "/api/v1/users", body).await;

    let response = get(app, "/api/v1/stats").await;
    let json = body_json(response).await;
    assert_eq!(json["users"], 1);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// Requesting a reset token for an unregistered email is forbidden.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_token_for_unknown_email_is_403(pool: PgPool) {
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com" });
    let response = post_json(app, "/api/v1/reset_password", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Updating the password with a bogus token is forbidden.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_password_with_invalid_token_is_403(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "bob@example.com", "password": "b4l0u" });
    post_json(app.clone(), "/api/v1/users", body).await;

    let body = serde_json::json!({
        "email": "bob@example.com",
        "reset_token": "not-a-real-token",
        "new_password": "t4rt1fl3tt3",
    });
    let response = request(
        app,
        Method::PUT,
        "/api/v1/reset_password",
        Some(body),
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The full reset flow: token request, password update, old credentials
/// dead, new credentials live, and the old session destroyed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_password_reset_flow(pool: PgPool) {
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "bob@example.com", "password": "b4l0u" });
    let response = post_json(app.clone(), "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let old_session = try_login(&app, "bob@example.com", "b4l0u", StatusCode::OK)
        .await
        .expect("login must set the session cookie");

    // 1. Request a reset token.
    let body = serde_json::json!({ "email": "bob@example.com" });
    let response = post_json(app.clone(), "/api/v1/reset_password", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "bob@example.com");
    let token = json["reset_token"]
        .as_str()
        .expect("response must carry the reset token")
        .to_string();

    // 2. Consume it.
    let body = serde_json::json!({
        "email": "bob@example.com",
        "reset_token": token,
        "new_password": "t4rt1fl3tt3",
    });
    let response = request(
        app.clone(),
        Method::PUT,
        "/api/v1/reset_password",
        Some(body.clone()),
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Password updated");

    // 3. The token is single-use.
    let response = request(app.clone(), Method::PUT, "/api/v1/reset_password", Some(body), &[]).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 4. Old password dead, new password live.
    try_login(&app, "bob@example.com", "b4l0u", StatusCode::UNAUTHORIZED).await;
    try_login(&app, "bob@example.com", "t4rt1fl3tt3", StatusCode::OK).await;

    // 5. The pre-reset session was destroyed.
    let response = request(
        app,
        Method::GET,
        "/api/v1/profile",
        None,
        &[cookie_header(&old_session)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
