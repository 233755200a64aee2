use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::dto::user::UserResponse;

/// Request model for user registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username (3-30 characters, immutable once created)
    pub username: String,

    /// Email address
    pub email: String,

    /// Password (6-128 characters)
    pub password: String,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email for authentication
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the authentication token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the token expires
    pub expires_in: i64,

    /// Sanitized user record
    pub user: UserResponse,
}

/// API response for registration
#[derive(ApiResponse)]
pub enum RegisterCreated {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
