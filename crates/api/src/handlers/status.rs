//! Handlers for service status and object counters.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use gatehouse_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/status
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// GET /api/v1/stats
///
/// Counts of each stored object type (currently just users).
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let users = UserRepo::count(&state.pool).await?;
    Ok(Json(json!({ "users": users })))
}
