//! Postal address owned by a user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
    pub zip_code: String,
}

/// Address fields supplied on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "Zip code is required"))]
    pub zip_code: String,
}
