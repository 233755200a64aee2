use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::types::dto::common::ErrorResponse;

/// API error taxonomy
///
/// Every flow returns one of these kinds; poem maps each variant to its
/// fixed status code. `InvalidCredentials` and `Unauthenticated` carry
/// deliberately generic messages so callers cannot probe which part of
/// a credential or token check failed.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request body failed shape/format validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Username or email already taken
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Unknown email or wrong password - undifferentiated
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Account exists but is inactive or suspended
    #[oai(status = 403)]
    AccountNotActive(Json<ErrorResponse>),

    /// Missing, malformed, expired or otherwise unverifiable token
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// Authenticated but not authorized for this resource
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Unexpected storage/hash failure; detail is logged, never returned
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl ApiError {
    /// Create a ValidationFailed error with the given reason
    pub fn validation_failed(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(Json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create a Conflict error naming the colliding field
    pub fn conflict(field: &str) -> Self {
        ApiError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: format!("User with this {} already exists", field),
            status_code: 409,
        }))
    }

    /// Create an InvalidCredentials error
    ///
    /// Same message for unknown email and wrong password.
    pub fn invalid_credentials() -> Self {
        ApiError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidCredentials error for a failed current-password
    /// check on a password change
    pub fn incorrect_password() -> Self {
        ApiError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Current password is incorrect".to_string(),
            status_code: 401,
        }))
    }

    /// Create an AccountNotActive error
    pub fn account_not_active() -> Self {
        ApiError::AccountNotActive(Json(ErrorResponse {
            error: "account_not_active".to_string(),
            message: "Account is not active. Please contact support.".to_string(),
            status_code: 403,
        }))
    }

    /// Create an Unauthenticated error
    ///
    /// The specific verification failure goes to the log at the call
    /// site; the caller always sees this generic message.
    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated(Json(ErrorResponse {
            error: "unauthenticated".to_string(),
            message: "Access denied. Invalid or missing token.".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "You do not have permission to access this resource".to_string(),
            status_code: 403,
        }))
    }

    /// Create a NotFound error
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("{} not found", resource),
            status_code: 404,
        }))
    }

    /// Create an Internal error
    ///
    /// Logs the full detail server-side and returns a fixed message.
    pub fn internal_error(detail: impl fmt::Display) -> Self {
        tracing::error!("internal error: {}", detail);
        ApiError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal server error".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ApiError::ValidationFailed(json) => json.0.message.clone(),
            ApiError::Conflict(json) => json.0.message.clone(),
            ApiError::InvalidCredentials(json) => json.0.message.clone(),
            ApiError::AccountNotActive(json) => json.0.message.clone(),
            ApiError::Unauthenticated(json) => json.0.message.clone(),
            ApiError::Forbidden(json) => json.0.message.clone(),
            ApiError::NotFound(json) => json.0.message.clone(),
            ApiError::Internal(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code for the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationFailed(json) => json.0.status_code,
            ApiError::Conflict(json) => json.0.status_code,
            ApiError::InvalidCredentials(json) => json.0.status_code,
            ApiError::AccountNotActive(json) => json.0.status_code,
            ApiError::Unauthenticated(json) => json.0.status_code,
            ApiError::Forbidden(json) => json.0.status_code,
            ApiError::NotFound(json) => json.0.status_code,
            ApiError::Internal(json) => json.0.status_code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
