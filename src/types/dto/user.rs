use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// Public representation of an identity record
///
/// The password hash is deliberately absent; this is the only user
/// shape that crosses the HTTP boundary.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID (UUID)
    pub id: String,

    /// Unique username
    pub username: String,

    /// Unique email, lowercased
    pub email: String,

    /// Role ("user" or "admin")
    pub role: String,

    /// Account status ("active", "inactive" or "suspended")
    pub status: String,

    /// Last successful login (unix timestamp)
    pub last_login: Option<i64>,

    /// Creation time (unix timestamp)
    pub created_at: i64,

    /// Last modification time (unix timestamp)
    pub updated_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role.to_string(),
            status: u.status.to_string(),
            last_login: u.last_login,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request model for updating a user record
///
/// `username` is accepted in the payload only so that attempts to
/// change it can be rejected explicitly; usernames are immutable.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// Rejected if present - usernames cannot be changed
    pub username: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New password
    pub password: Option<String>,

    /// Current password, required when a non-admin changes their own
    /// password
    pub current_password: Option<String>,

    /// New role ("user" or "admin"), admin actors only
    pub role: Option<String>,

    /// New status ("active", "inactive" or "suspended"), admin actors only
    pub status: Option<String>,
}

/// Response model for user deletion
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// Success message
    pub message: String,
}
