//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::{Address, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub age: i32,
    /// Argon2 PHC string
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
    #[sea_orm(unique)]
    pub address_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::AddressId",
        to = "super::address::Column::Id",
        on_delete = "Restrict"
    )]
    Address,
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Join with the owned address row. A user without one is corrupt data.
    pub fn into_domain(self, address: Option<super::address::Model>) -> AppResult<User> {
        let address = address.ok_or_else(|| {
            AppError::internal(format!(
                "user {} references missing address {}",
                self.id, self.address_id
            ))
        })?;

        Ok(self.with_address(address.into()))
    }

    /// Build the domain user around an address already in hand.
    pub fn with_address(self, address: Address) -> User {
        User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            age: self.age,
            address,
        }
    }
}
