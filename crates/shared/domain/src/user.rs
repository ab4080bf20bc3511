//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::address::{Address, NewAddress};

/// User domain entity. The owned address is always loaded with the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub age: i32,
    pub address: Address,
}

/// Registration input. Address fields sit at the top level of the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plaintext password, hashed before storage
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub address: NewAddress,
}

/// Row data handed to the user store once the address exists.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub age: i32,
    pub password_hash: String,
    pub address: Address,
}

/// Partial user update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
}

impl UpdateUser {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.age.is_none()
    }
}

/// Outcome of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub rows_affected: u64,
}
