//! Auth service configuration.

use common::{env_first, env_or, AppError, AppResult, DatabaseConfig, JwtConfig};
use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Token signing settings
    pub jwt: JwtConfig,
    /// Credential store
    pub database: DatabaseConfig,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails when `JWT_SECRET` is missing or shorter than 32 characters.
    pub fn from_env() -> AppResult<Self> {
        let secret = env_first(&["JWT_SECRET", "AUTH_SERVICE_JWT_SECRET"]).ok_or_else(|| {
            AppError::validation("JWT_SECRET must be set (minimum 32 characters)")
        })?;

        let config = Self {
            jwt: JwtConfig {
                secret,
                expiration_hours: env_or(
                    &["JWT_EXPIRATION_HOURS", "AUTH_SERVICE_JWT_EXPIRATION_HOURS"],
                    DEFAULT_JWT_EXPIRATION_HOURS,
                ),
            },
            database: DatabaseConfig::from_env(&["AUTH_SERVICE_DATABASE_URL", "DATABASE_URL"]),
            host: env_or(&["AUTH_SERVICE_HOST"], "0.0.0.0".to_string()),
            port: env_or(&["AUTH_SERVICE_PORT"], 50051),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.jwt.secret.chars().count() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(AppError::validation("JWT_EXPIRATION_HOURS must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthServiceConfig {
        AuthServiceConfig {
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_hours: 24,
            },
            database: DatabaseConfig::default(),
            host: "127.0.0.1".to_string(),
            port: 50051,
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(config("too-short").validate().is_err());
        assert!(config(&"k".repeat(32)).validate().is_ok());
    }
}
