//! Credential service - password hashing and token issuing.
//!
//! DDD: Uses domain Password value object for hashing.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthServiceConfig;
use common::{AppError, AppResult};
use domain::{Password, User, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};

/// Well-formed Argon2id hash that matches no password. Verifying against it
/// keeps the cost of a lookup miss equal to a wrong password.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMjM";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
}

/// Credential operations consumed by the user service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CredentialService: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash_password(&self, plain_text: &str) -> AppResult<String>;

    /// Check a plaintext password against a stored hash
    fn verify_password(&self, plain_text: &str, hash: &str) -> bool;

    /// Issue a signed token for a user
    fn generate_jwt(&self, user: &User) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Argon2 + HS256 implementation of [`CredentialService`].
pub struct Authenticator {
    config: AuthServiceConfig,
}

impl Authenticator {
    pub fn new(config: AuthServiceConfig) -> Self {
        Self { config }
    }
}

impl CredentialService for Authenticator {
    fn hash_password(&self, plain_text: &str) -> AppResult<String> {
        Ok(Password::new(plain_text)?.into_string())
    }

    fn verify_password(&self, plain_text: &str, hash: &str) -> bool {
        Password::from_hash(hash).verify(plain_text)
    }

    fn generate_jwt(&self, user: &User) -> AppResult<TokenResponse> {
        let hours = self.config.jwt_expiration_hours;
        let overflow =
            || AppError::internal(format!("token lifetime of {} hours overflows", hours));

        let now = Utc::now();
        let expires_at = Duration::try_hours(hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(overflow)?;
        let expires_in = hours.checked_mul(SECONDS_PER_HOUR).ok_or_else(overflow)?;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        tracing::debug!(user_id = %user.id, "Issued access token");

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthorized
        })?;

        Ok(token_data.claims)
    }
}
