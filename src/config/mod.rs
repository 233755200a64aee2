// Configuration layer - built once at startup, passed by reference.
// Core logic never reads the environment directly.
pub mod env_provider;
pub mod logging;

use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use logging::init_logging;
use std::fmt;

/// Minimum JWT secret length outside development
const MIN_SECRET_LEN: usize = 32;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is required")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} characters in {0}")]
    WeakJwtSecret(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw {
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application basics
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

/// Token signing settings
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl_hours: i64,
    pub issuer: String,
    pub audience: String,
}

/// Password hashing settings (Argon2id work factor)
#[derive(Debug, Clone)]
pub struct HashSettings {
    pub memory_kib: u32,
    pub time_cost: u32,
}

/// Complete application configuration
///
/// Constructed once in `main` and shared by reference; validation
/// failures abort startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database_url: String,
    pub jwt: JwtSettings,
    pub hash: HashSettings,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&SystemEnvironment)
    }

    /// Load configuration from the given provider and validate it
    pub fn load(env: &impl EnvironmentProvider) -> Result<Self, ConfigError> {
        let environment =
            Environment::parse(&env.get_var("APP_ENV").unwrap_or_default());

        let name = env
            .get_var("APP_NAME")
            .unwrap_or_else(|| "identity-backend".to_string());
        let host = env.get_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_int(env, "PORT", 3000, 1, 65535)? as u16;

        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://identity.db?mode=rwc".to_string());

        // Development gets a fallback secret so the server starts
        // without a .env; anything else must provide a real one.
        let secret = match env.get_var("JWT_SECRET") {
            Some(s) if !s.is_empty() => s,
            _ if environment.is_development() => {
                "development-secret-do-not-use-in-production".to_string()
            }
            _ => return Err(ConfigError::MissingJwtSecret),
        };
        if !environment.is_development() && secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret(environment.to_string()));
        }

        let ttl_hours = parse_int(env, "JWT_TTL_HOURS", 24, 1, 24 * 365)?;
        let issuer = env.get_var("JWT_ISSUER").unwrap_or_else(|| name.clone());
        let audience = env.get_var("JWT_AUDIENCE").unwrap_or_else(|| name.clone());

        let memory_kib = parse_int(env, "HASH_MEMORY_KIB", 19_456, 8, 1_048_576)? as u32;
        let time_cost = parse_int(env, "HASH_TIME_COST", 2, 1, 64)? as u32;

        Ok(Self {
            app: AppSettings {
                name,
                host,
                port,
                environment,
            },
            database_url,
            jwt: JwtSettings {
                secret,
                ttl_hours,
                issuer,
                audience,
            },
            hash: HashSettings {
                memory_kib,
                time_cost,
            },
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn parse_int(
    env: &impl EnvironmentProvider,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<i64, ConfigError> {
    match env.get_var(key) {
        None => Ok(default),
        Some(raw) => {
            let n: i64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
            })?;
            if n < min || n > max {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                });
            }
            Ok(n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::env_provider::MockEnvironment;
    use super::*;

    #[test]
    fn defaults_apply_in_development() {
        let cfg = AppConfig::load(&MockEnvironment::empty()).unwrap();

        assert_eq!(cfg.app.port, 3000);
        assert_eq!(cfg.app.environment, Environment::Development);
        assert_eq!(cfg.jwt.ttl_hours, 24);
        assert_eq!(cfg.jwt.issuer, "identity-backend");
        assert_eq!(cfg.jwt.audience, "identity-backend");
        assert!(cfg.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn production_requires_a_secret() {
        let env = MockEnvironment::empty().with_var("APP_ENV", "production");
        let result = AppConfig::load(&env);
        assert!(matches!(result, Err(ConfigError::MissingJwtSecret)));
    }

    #[test]
    fn production_rejects_short_secret() {
        let env = MockEnvironment::empty()
            .with_var("APP_ENV", "production")
            .with_var("JWT_SECRET", "short");
        let result = AppConfig::load(&env);
        match result {
            Err(ConfigError::WeakJwtSecret(env_name)) => assert_eq!(env_name, "production"),
            other => panic!("Expected WeakJwtSecret, got {:?}", other),
        }
    }

    #[test]
    fn production_accepts_long_secret() {
        let env = MockEnvironment::empty()
            .with_var("APP_ENV", "production")
            .with_var("JWT_SECRET", "a-production-secret-at-least-32-chars-long");
        let cfg = AppConfig::load(&env).unwrap();
        assert_eq!(cfg.app.environment, Environment::Production);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let env = MockEnvironment::empty().with_var("PORT", "not-a-port");
        assert!(matches!(
            AppConfig::load(&env),
            Err(ConfigError::InvalidValue { .. })
        ));

        let env = MockEnvironment::empty().with_var("PORT", "70000");
        assert!(matches!(
            AppConfig::load(&env),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn issuer_and_audience_default_to_app_name() {
        let env = MockEnvironment::empty().with_var("APP_NAME", "my-deployment");
        let cfg = AppConfig::load(&env).unwrap();
        assert_eq!(cfg.jwt.issuer, "my-deployment");
        assert_eq!(cfg.jwt.audience, "my-deployment");
    }

    #[test]
    fn ttl_override_is_honored() {
        let env = MockEnvironment::empty().with_var("JWT_TTL_HOURS", "1");
        let cfg = AppConfig::load(&env).unwrap();
        assert_eq!(cfg.jwt.ttl_hours, 1);
    }
}
