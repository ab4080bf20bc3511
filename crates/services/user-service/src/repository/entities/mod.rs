//! SeaORM entities.

pub mod address;
pub mod user;
