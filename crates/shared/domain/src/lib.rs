//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Users own exactly one postal address; both are shared by the user service
//! and the credential service.

pub mod address;
pub mod constants;
pub mod error;
pub mod password;
pub mod user;
pub mod validation;

pub use address::{Address, NewAddress};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use user::{CreateUser, NewUser, UpdateResult, UpdateUser, User};
pub use validation::validate;
