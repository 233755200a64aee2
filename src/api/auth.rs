use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::extract_token;
use crate::errors::ApiError;
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, RegisterCreated, RegisterRequest, TokenResponse};
use crate::types::dto::user::UserResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth: Arc<AuthService>,
}

impl AuthApi {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account
    ///
    /// Returns the sanitized user record. The password hash never
    /// appears in any response.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<RegisterCreated, ApiError> {
        let created = self.auth.register(&body).await?;
        Ok(RegisterCreated::Created(Json(UserResponse::from(created))))
    }

    /// Login with email and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let (token, user) = self.auth.login(&body.email, &body.password).await?;
        Ok(Json(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth.token_ttl_seconds(),
            user: UserResponse::from(user),
        }))
    }

    /// Return the profile of the authenticated user
    ///
    /// Accepts the token from the `Authorization: Bearer` header or,
    /// failing that, the `token` cookie.
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, req: &Request) -> Result<Json<UserResponse>, ApiError> {
        let token = extract_token(req);
        let user = self.auth.authenticate(token.as_deref()).await?;
        Ok(Json(UserResponse::from(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HashSettings, JwtSettings};
    use crate::services::{PasswordHasher, TokenService};
    use crate::stores::{SqlUserStore, UserStore};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> AuthApi {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let store: Arc<dyn UserStore> = Arc::new(SqlUserStore::new(db));
        let hasher = Arc::new(
            PasswordHasher::new(&HashSettings {
                memory_kib: 1024,
                time_cost: 1,
            })
            .unwrap(),
        );
        let tokens = Arc::new(TokenService::new(&JwtSettings {
            secret: "test-secret-key-minimum-32-characters".to_string(),
            ttl_hours: 24,
            issuer: "identity-backend".to_string(),
            audience: "identity-backend".to_string(),
        }));

        AuthApi::new(Arc::new(AuthService::new(store, hasher, tokens)))
    }

    fn register_body() -> Json<RegisterRequest> {
        Json(RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        })
    }

    #[tokio::test]
    async fn register_returns_created_with_sanitized_body() {
        let api = setup().await;

        let RegisterCreated::Created(Json(user)) =
            api.register(register_body()).await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[tokio::test]
    async fn login_returns_bearer_token_with_ttl() {
        let api = setup().await;
        api.register(register_body()).await.unwrap();

        let Json(resp) = api
            .login(Json(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 24 * 3600);
        assert!(!resp.token.is_empty());
        assert_eq!(resp.user.username, "alice");
        assert!(resp.user.last_login.is_some());
    }

    #[tokio::test]
    async fn me_accepts_header_and_cookie_tokens() {
        let api = setup().await;
        api.register(register_body()).await.unwrap();

        let Json(resp) = api
            .login(Json(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            }))
            .await
            .unwrap();

        let via_header = Request::builder()
            .header("Authorization", format!("Bearer {}", resp.token))
            .finish();
        let Json(user) = api.me(&via_header).await.unwrap();
        assert_eq!(user.username, "alice");

        let via_cookie = Request::builder()
            .header("Cookie", format!("token={}", resp.token))
            .finish();
        let Json(user) = api.me(&via_cookie).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn me_without_token_is_unauthenticated() {
        let api = setup().await;

        let req = Request::builder().finish();
        let result = api.me(&req).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn me_with_garbage_token_is_unauthenticated() {
        let api = setup().await;

        let req = Request::builder()
            .header("Authorization", "Bearer not.a.jwt")
            .finish();
        let result = api.me(&req).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let api = setup().await;
        api.register(register_body()).await.unwrap();

        let result = api
            .login(Json(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "wrong-password".to_string(),
            }))
            .await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials(_))));
    }
}
