//! Address repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::entities::address::{ActiveModel, Entity as AddressEntity};
use common::{AppError, AppResult};
use domain::{Address, NewAddress};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Address repository trait for dependency injection.
///
/// Pure persistence: no validation or uniqueness rules.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Insert an address with a generated ID
    async fn save(&self, fields: NewAddress) -> AppResult<Address>;

    /// Delete an address by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Address repository bound to the connection pool
pub struct AddressStore {
    db: DatabaseConnection,
}

impl AddressStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepository for AddressStore {
    async fn save(&self, fields: NewAddress) -> AppResult<Address> {
        save(&self.db, fields).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }
}

// Queries shared by the pooled and transactional repositories.

pub(crate) async fn save<C: ConnectionTrait>(db: &C, fields: NewAddress) -> AppResult<Address> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        country: Set(fields.country),
        city: Set(fields.city),
        street: Set(fields.street),
        zip_code: Set(fields.zip_code),
    };

    let model = active_model.insert(db).await.map_err(AppError::from)?;
    Ok(Address::from(model))
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = AddressEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found(format!("there is no address with ID {}", id)));
    }

    Ok(())
}
