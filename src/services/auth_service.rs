use chrono::Utc;
use std::sync::Arc;

use crate::errors::ApiError;
use crate::services::token_service::{TokenError, TokenService};
use crate::services::validation::RegistrationValidator;
use crate::services::PasswordHasher;
use crate::stores::{NewUser, UserStore};
use crate::types::db::user::{self, Role, Status};
use crate::types::dto::auth::RegisterRequest;

/// Orchestrates registration, login and request-time authentication
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    validator: RegistrationValidator,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            validator: RegistrationValidator::new(),
        }
    }

    /// Seconds a freshly issued token stays valid
    pub fn token_ttl_seconds(&self) -> i64 {
        self.tokens.ttl_seconds()
    }

    /// Register a new user
    ///
    /// Validates input, checks uniqueness by email then username,
    /// hashes the password and persists the record with the default
    /// role and status. The store's unique constraints remain the
    /// final arbiter if a concurrent registration wins the race.
    pub async fn register(&self, req: &RegisterRequest) -> Result<user::Model, ApiError> {
        let input = self
            .validator
            .validate_registration(req)
            .map_err(|e| ApiError::validation_failed(e.to_string()))?;

        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::conflict("email"));
        }
        if self.store.find_by_username(&input.username).await?.is_some() {
            return Err(ApiError::conflict("username"));
        }

        let password_hash = self
            .hasher
            .hash(&input.password)
            .map_err(|e| ApiError::internal_error(format!("hash password: {}", e)))?;

        let created = self
            .store
            .create(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                role: Role::User,
                status: Status::Active,
            })
            .await?;

        tracing::info!(user_id = %created.id, username = %created.username, "user registered");
        Ok(created)
    }

    /// Log a user in by email and password
    ///
    /// Unknown email and wrong password both produce the same
    /// `InvalidCredentials`; a non-active account is reported
    /// distinctly. Returns the signed token and the (sanitizable)
    /// record with `last_login` already reflecting this login.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, user::Model), ApiError> {
        let mut user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(ApiError::invalid_credentials()),
        };

        if !user.status.is_active() {
            return Err(ApiError::account_not_active());
        }

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|e| ApiError::internal_error(format!("verify password: {}", e)))?;
        if !matches {
            return Err(ApiError::invalid_credentials());
        }

        // Best effort: a failed last-login write never fails the login.
        let now = Utc::now().timestamp();
        match self.store.record_login(&user.id, now).await {
            Ok(()) => {
                user.last_login = Some(now);
                user.updated_at = now;
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, "failed to record last login: {}", e)
            }
        }

        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| ApiError::internal_error(format!("issue token: {}", e)))?;

        tracing::info!(user_id = %user.id, "login succeeded");
        Ok((token, user))
    }

    /// Resolve the acting identity for a protected request
    ///
    /// Verifies the token and then re-fetches the identity record, so
    /// a deleted or suspended account is locked out immediately even
    /// though the token itself cannot be revoked. The specific
    /// verification failure is logged; the caller gets a generic
    /// `Unauthenticated`.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<user::Model, ApiError> {
        let token = match token {
            Some(t) => t,
            None => {
                tracing::debug!("request carried no token");
                return Err(ApiError::unauthenticated());
            }
        };

        let claims = match self.tokens.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                let subject = self
                    .tokens
                    .decode_unverified(token)
                    .map(|c| c.sub)
                    .unwrap_or_else(|| "<undecodable>".to_string());
                match e {
                    TokenError::Expired => {
                        tracing::warn!(%subject, "rejected expired token")
                    }
                    TokenError::NotYetValid => {
                        tracing::warn!(%subject, "rejected not-yet-valid token")
                    }
                    ref other => {
                        tracing::warn!(%subject, "rejected token: {}", other)
                    }
                }
                return Err(ApiError::unauthenticated());
            }
        };

        let user = match self.store.find_by_id(&claims.sub).await? {
            Some(user) => user,
            None => {
                tracing::warn!(subject = %claims.sub, "token subject no longer exists");
                return Err(ApiError::unauthenticated());
            }
        };

        if !user.status.is_active() {
            tracing::warn!(user_id = %user.id, status = %user.status, "blocked non-active account");
            return Err(ApiError::account_not_active());
        }

        Ok(user)
    }
}
