//! Credential service business logic.

mod credential_service;

pub use credential_service::{
    Authenticator, Claims, CredentialService, TokenResponse, DUMMY_PASSWORD_HASH,
};

#[cfg(any(test, feature = "test-utils"))]
pub use credential_service::MockCredentialService;
