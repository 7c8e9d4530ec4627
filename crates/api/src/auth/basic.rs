//! HTTP Basic authentication: header parsing and credential resolution.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use gatehouse_db::models::user::User;
use gatehouse_db::repositories::UserRepo;
use gatehouse_db::DbPool;

use super::password::verify_password;

/// Extract the email/password pair from a `Basic` Authorization header value.
///
/// Requires the `Basic ` scheme prefix, valid base64, a UTF-8 payload, and a
/// `:` separator. Only the first `:` splits, so passwords may contain `:`.
/// Any violation yields `None`.
pub fn parse_basic_authorization(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

/// Resolve Basic credentials to a user.
///
/// Unknown email, wrong password, and storage errors all yield `None` so
/// the gate stays closed.
pub async fn user_from_credentials(pool: &DbPool, email: &str, password: &str) -> Option<User> {
    if email.is_empty() || password.is_empty() {
        return None;
    }
    let user = match UserRepo::find_by_email(pool, email).await {
        Ok(user) => user?,
        Err(err) => {
            tracing::warn!(error = %err, "credential lookup failed");
            return None;
        }
    };
    verify_password(password, &user.password_hash).then_some(user)
}
