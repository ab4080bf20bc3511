//! Address database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Address;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "address_korean")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
    #[sea_orm(column_name = "zipCode")]
    pub zip_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user::Entity")]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Address {
    fn from(model: Model) -> Self {
        Address {
            id: model.id,
            country: model.country,
            city: model.city,
            street: model.street,
            zip_code: model.zip_code,
        }
    }
}
