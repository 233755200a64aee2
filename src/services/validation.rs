use regex::Regex;

use crate::types::dto::auth::RegisterRequest;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 128;

// Same pattern the user schema historically enforced.
const EMAIL_PATTERN: &str = r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$";

/// Errors raised by input validation, before anything touches the store
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Username must be at least {USERNAME_MIN} characters long")]
    UsernameTooShort,

    #[error("Username cannot exceed {USERNAME_MAX} characters")]
    UsernameTooLong,

    #[error("Password must be at least {PASSWORD_MIN} characters long")]
    PasswordTooShort,

    #[error("Password cannot exceed {PASSWORD_MAX} characters")]
    PasswordTooLong,

    #[error("Please enter a valid email")]
    InvalidEmail,
}

/// Registration input after validation and normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validates and normalizes registration/update input
///
/// Usernames are trimmed; emails are trimmed and lowercased. All
/// checks run before the password is hashed or the store is touched.
pub struct RegistrationValidator {
    email_re: Regex,
}

impl RegistrationValidator {
    pub fn new() -> Self {
        Self {
            // Pattern is a constant; compilation cannot fail.
            email_re: Regex::new(EMAIL_PATTERN).expect("email pattern compiles"),
        }
    }

    /// Validate a full registration request
    pub fn validate_registration(
        &self,
        req: &RegisterRequest,
    ) -> Result<ValidRegistration, ValidationError> {
        let username = self.validate_username(&req.username)?;
        let password = self.validate_password(&req.password)?;
        let email = self.validate_email(&req.email)?;

        Ok(ValidRegistration {
            username,
            email,
            password,
        })
    }

    /// Validate and trim a username
    pub fn validate_username(&self, raw: &str) -> Result<String, ValidationError> {
        let username = raw.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("Username"));
        }
        if username.chars().count() < USERNAME_MIN {
            return Err(ValidationError::UsernameTooShort);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(ValidationError::UsernameTooLong);
        }
        Ok(username.to_string())
    }

    /// Validate a password (length only; hashing comes later)
    pub fn validate_password(&self, raw: &str) -> Result<String, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        if raw.chars().count() < PASSWORD_MIN {
            return Err(ValidationError::PasswordTooShort);
        }
        if raw.chars().count() > PASSWORD_MAX {
            return Err(ValidationError::PasswordTooLong);
        }
        Ok(raw.to_string())
    }

    /// Validate, trim and lowercase an email address
    pub fn validate_email(&self, raw: &str) -> Result<String, ValidationError> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            return Err(ValidationError::MissingField("Email"));
        }
        if !self.email_re.is_match(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(email)
    }
}

impl Default for RegistrationValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_and_normalizes_valid_input() {
        let v = RegistrationValidator::new();

        let out = v
            .validate_registration(&request("  alice ", " Alice@Example.COM ", "secret1"))
            .unwrap();

        assert_eq!(out.username, "alice");
        assert_eq!(out.email, "alice@example.com");
        assert_eq!(out.password, "secret1");
    }

    #[test]
    fn rejects_missing_fields() {
        let v = RegistrationValidator::new();

        assert_eq!(
            v.validate_registration(&request("", "a@example.com", "secret1")),
            Err(ValidationError::MissingField("Username"))
        );
        assert_eq!(
            v.validate_registration(&request("alice", "a@example.com", "")),
            Err(ValidationError::MissingField("Password"))
        );
        assert_eq!(
            v.validate_registration(&request("alice", "   ", "secret1")),
            Err(ValidationError::MissingField("Email"))
        );
    }

    #[test]
    fn rejects_short_username() {
        let v = RegistrationValidator::new();
        assert_eq!(
            v.validate_username("ab"),
            Err(ValidationError::UsernameTooShort)
        );
        assert!(v.validate_username("abc").is_ok());
    }

    #[test]
    fn rejects_overlong_username() {
        let v = RegistrationValidator::new();
        let long = "a".repeat(31);
        assert_eq!(
            v.validate_username(&long),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn rejects_short_password() {
        let v = RegistrationValidator::new();
        assert_eq!(
            v.validate_password("five5"),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(v.validate_password("secret").is_ok());
    }

    #[test]
    fn rejects_overlong_password() {
        let v = RegistrationValidator::new();
        let long = "p".repeat(129);
        assert_eq!(
            v.validate_password(&long),
            Err(ValidationError::PasswordTooLong)
        );
    }

    #[test]
    fn validates_email_shape() {
        let v = RegistrationValidator::new();

        assert!(v.validate_email("alice@example.com").is_ok());
        assert!(v.validate_email("a.b-c@sub.example.org").is_ok());

        assert_eq!(v.validate_email("alice"), Err(ValidationError::InvalidEmail));
        assert_eq!(
            v.validate_email("alice@"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            v.validate_email("alice@nodomain"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            v.validate_email("@example.com"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn lowercases_email() {
        let v = RegistrationValidator::new();
        assert_eq!(
            v.validate_email("Alice@EXAMPLE.Com").unwrap(),
            "alice@example.com"
        );
    }
}
