//! Repository layer for data access.

pub(crate) mod address_repository;
pub mod entities;
pub(crate) mod user_repository;

pub use address_repository::{AddressRepository, AddressStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use address_repository::MockAddressRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

pub(crate) use address_repository as address_queries;
pub(crate) use user_repository as user_queries;
