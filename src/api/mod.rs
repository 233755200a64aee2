// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod users;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use users::UsersApi;

use poem::Request;

/// Pull the access token off a request.
///
/// The `Authorization: Bearer` header is authoritative; the `token`
/// cookie is only consulted when no usable header is present, so
/// browser clients and API clients can coexist on one deployment.
pub fn extract_token(req: &Request) -> Option<String> {
    if let Some(value) = req.header("Authorization") {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let header = req.header("Cookie")?;
    for pair in header.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == "token" && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
