use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt;

use crate::config::JwtSettings;
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// Verification failure kinds
///
/// The distinction is for logs and tests; callers of the HTTP API see
/// a single generic `Unauthenticated` response for all three.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token signing failed: {0}")]
    SigningFailed(String),
}

/// Issues and verifies signed, time-bound identity tokens
///
/// Tokens are stateless: nothing is persisted server-side, and there
/// is no revocation list. Access control compensates by re-fetching
/// the identity record on every request.
pub struct TokenService {
    secret: String,
    ttl_seconds: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    /// Create a new TokenService from the JWT settings
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            ttl_seconds: settings.ttl_hours * 3600,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
        }
    }

    /// Number of seconds a freshly issued token stays valid
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a signed token for the given identity record
    pub fn issue(&self, user: &user::Model) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role.to_string(),
            email: Some(user.email.clone()),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            nbf: now,
            exp: now + self.ttl_seconds,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token and return its claims
    ///
    /// Checks signature (HS256 only - an unsigned or alg-none token
    /// can never pass), issuer, audience, expiry and not-before, with
    /// zero leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Invalid(e.to_string()),
        })?;

        Ok(data.claims)
    }

    /// Decode claims without verification
    ///
    /// Non-authoritative inspection only (logging, displaying expiry).
    /// Must never be used to establish identity.
    pub fn decode_unverified(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(token, &DecodingKey::from_secret(b"unused"), &validation)
            .ok()
            .map(|data| data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::user::{Role, Status};
    use uuid::Uuid;

    fn settings(secret: &str) -> JwtSettings {
        JwtSettings {
            secret: secret.to_string(),
            ttl_hours: 24,
            issuer: "identity-backend".to_string(),
            audience: "identity-backend".to_string(),
        }
    }

    fn sample_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "irrelevant".to_string(),
            role: Role::User,
            status: Status::Active,
            last_login: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn encode_claims(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_verifies_and_carries_identity() {
        let service = TokenService::new(&settings("test-secret-key-minimum-32-characters"));
        let user = sample_user();

        let token = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let secret = "test-secret-key-minimum-32-characters";
        let service = TokenService::new(&settings(secret));

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u-1".to_string(),
            username: "alice".to_string(),
            role: "user".to_string(),
            email: None,
            iss: "identity-backend".to_string(),
            aud: "identity-backend".to_string(),
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
        };
        let token = encode_claims(&claims, secret);

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn not_yet_valid_token_is_rejected_as_immature() {
        let secret = "test-secret-key-minimum-32-characters";
        let service = TokenService::new(&settings(secret));

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u-1".to_string(),
            username: "alice".to_string(),
            role: "user".to_string(),
            email: None,
            iss: "identity-backend".to_string(),
            aud: "identity-backend".to_string(),
            iat: now,
            nbf: now + 3600,
            exp: now + 7200,
        };
        let token = encode_claims(&claims, secret);

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::NotYetValid)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let service = TokenService::new(&settings("test-secret-key-minimum-32-characters"));
        let other = TokenService::new(&settings("another-secret-key-of-decent-length"));

        let token = other.issue(&sample_user()).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn token_minted_for_other_deployment_is_invalid() {
        let secret = "test-secret-key-minimum-32-characters";
        let service = TokenService::new(&settings(secret));

        let mut other_settings = settings(secret);
        other_settings.issuer = "some-other-app".to_string();
        other_settings.audience = "some-other-app".to_string();
        let other = TokenService::new(&other_settings);

        let token = other.issue(&sample_user()).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let service = TokenService::new(&settings("test-secret-key-minimum-32-characters"));

        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn decode_unverified_reads_expired_tokens() {
        let secret = "test-secret-key-minimum-32-characters";
        let service = TokenService::new(&settings(secret));

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u-1".to_string(),
            username: "alice".to_string(),
            role: "user".to_string(),
            email: None,
            iss: "identity-backend".to_string(),
            aud: "identity-backend".to_string(),
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
        };
        let token = encode_claims(&claims, secret);

        let decoded = service.decode_unverified(&token).unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert_eq!(decoded.exp, now - 3600);
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let service = TokenService::new(&settings("super-secret-signing-key-value-here"));
        let debug = format!("{:?}", service);

        assert!(!debug.contains("super-secret-signing-key-value-here"));
        assert!(debug.contains("<redacted>"));
    }
}
