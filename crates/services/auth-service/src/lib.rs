//! Credential Service Library
//!
//! Password hashing and JWT issuing for the user registry. Consumers depend
//! on the [`CredentialService`] trait and receive an [`Authenticator`] at
//! construction time.

pub mod config;
pub mod service;

pub use config::AuthServiceConfig;
pub use service::{Authenticator, Claims, CredentialService, TokenResponse, DUMMY_PASSWORD_HASH};

#[cfg(any(test, feature = "test-utils"))]
pub use service::MockCredentialService;
