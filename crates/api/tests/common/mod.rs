use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderName, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use gatehouse_api::config::{ServerConfig, SessionBackend, SessionConfig};
use gatehouse_api::router::build_app_router;
use gatehouse_api::state::AppState;
use gatehouse_core::session::{MemoryRegistry, SessionRegistry};
use gatehouse_db::session_registry::PgSessionRegistry;

/// Cookie name used by the test configuration.
pub const COOKIE_NAME: &str = "session_id";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and sessions that never expire.
pub fn test_config(backend: SessionBackend) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session: SessionConfig {
            cookie_name: COOKIE_NAME.to_string(),
            ttl_secs: 0,
            backend,
        },
    }
}

/// Build the full application router with the in-memory session registry.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (gate, CORS, request ID, timeout,
/// tracing, panic recovery) that production uses. Clone the returned router
/// per request; clones share the registry and the pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, SessionBackend::Memory)
}

/// Build the full application router with the database-backed registry.
pub fn build_test_app_db(pool: PgPool) -> Router {
    build_app(pool, SessionBackend::Database)
}

fn build_app(pool: PgPool, backend: SessionBackend) -> Router {
    let config = test_config(backend);
    let sessions: Arc<dyn SessionRegistry> = match backend {
        SessionBackend::Memory => Arc::new(MemoryRegistry::new(config.session.ttl())),
        SessionBackend::Database => {
            Arc::new(PgSessionRegistry::new(pool.clone(), config.session.ttl()))
        }
    };

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional JSON body and extra headers.
pub async fn request(
    app: Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
    headers: &[(HeaderName, String)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    request(app, Method::GET, path, None, &[]).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::POST, path, Some(body), &[]).await
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Extract the session cookie value from a login response.
pub fn session_cookie_from(response: &Response<Body>, cookie_name: &str) -> Option<String> {
    let raw = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    (name == cookie_name).then(|| value.to_string())
}

/// Cookie header pair carrying a session token.
pub fn cookie_header(session_id: &str) -> (HeaderName, String) {
    (COOKIE, format!("{COOKIE_NAME}={session_id}"))
}

/// Basic Authorization header pair for the given credentials.
pub fn basic_auth_header(email: &str, password: &str) -> (HeaderName, String) {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    (
        AUTHORIZATION,
        format!("Basic {}", STANDARD.encode(format!("{email}:{password}"))),
    )
}
