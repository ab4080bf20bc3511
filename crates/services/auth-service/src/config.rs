//! Credential service configuration.

use std::env;

use common::{AppError, AppResult};
use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

#[cfg(debug_assertions)]
const DEV_JWT_SECRET: &str = "development-only-secret-change-me-0123456789";

/// Credential service configuration.
#[derive(Clone)]
pub struct AuthServiceConfig {
    /// JWT secret for signing tokens (min 32 characters)
    pub jwt_secret: String,
    /// JWT token expiration in hours
    pub jwt_expiration_hours: i64,
}

impl AuthServiceConfig {
    /// Build a configuration, rejecting secrets shorter than the minimum.
    pub fn new(jwt_secret: impl Into<String>, jwt_expiration_hours: i64) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT secret must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&jwt_expiration_hours) {
            return Err(AppError::validation(format!(
                "JWT expiration must be between 1 and {} hours",
                MAX_JWT_EXPIRATION_HOURS
            )));
        }

        Ok(Self {
            jwt_secret,
            jwt_expiration_hours,
        })
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = match env::var("JWT_SECRET")
            .or_else(|_| env::var("AUTH_SERVICE_JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) => Self::fallback_secret()?,
        };

        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .or_else(|_| env::var("AUTH_SERVICE_JWT_EXPIRATION_HOURS"))
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS);

        Self::new(jwt_secret, jwt_expiration_hours)
    }

    #[cfg(debug_assertions)]
    fn fallback_secret() -> AppResult<String> {
        tracing::warn!("JWT_SECRET not set, using development secret");
        Ok(DEV_JWT_SECRET.to_string())
    }

    #[cfg(not(debug_assertions))]
    fn fallback_secret() -> AppResult<String> {
        Err(AppError::internal(
            "JWT_SECRET must be set (minimum 32 characters)",
        ))
    }

    /// Get JWT secret as bytes.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

// Don't expose the secret in debug output
impl std::fmt::Debug for AuthServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .finish()
    }
}
