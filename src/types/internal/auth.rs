use serde::{Deserialize, Serialize};

/// JWT claims structure
///
/// Signed assertions of identity and role. Verification checks
/// signature, issuer, audience, `exp` and `nbf`; the claims are still
/// non-authoritative for `role`/`status` - access control re-fetches
/// the identity record on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Username at issue time
    pub username: String,

    /// Role at issue time
    pub role: String,

    /// Email at issue time (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issuer - binds the token to this deployment
    pub iss: String,

    /// Audience - binds the token to this deployment
    pub aud: String,

    /// Issued at (unix timestamp)
    pub iat: i64,

    /// Not valid before (unix timestamp, equals `iat`)
    pub nbf: i64,

    /// Expiration (unix timestamp)
    pub exp: i64,
}
