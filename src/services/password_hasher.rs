use argon2::password_hash::SaltString;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
use rand_core::OsRng;

use crate::config::HashSettings;

/// Errors raised by hashing or verification
///
/// These are internal failures; plaintext length/strength validation
/// happens before hashing, in the registration flow.
#[derive(Debug, thiserror::Error)]
pub enum PasswordHashError {
    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),

    #[error("password hashing failed: {0}")]
    HashFailed(String),

    #[error("stored digest is malformed: {0}")]
    MalformedDigest(String),
}

/// One-way salted password hashing (Argon2id)
///
/// Each hash gets a fresh random salt; verification recomputes the
/// digest and compares with the algorithm's constant-time comparator.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the configured work factor
    pub fn new(settings: &HashSettings) -> Result<Self, PasswordHashError> {
        let params = Params::new(settings.memory_kib, settings.time_cost, 1, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password into a PHC-format digest
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashFailed(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Verify a plaintext password against a stored digest
    ///
    /// A mismatch is `Ok(false)`; only a malformed digest is an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| PasswordHashError::MalformedDigest(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::MalformedDigest(e.to_string())),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
