//! Migration: Create the address table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AddressKorean::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AddressKorean::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AddressKorean::Country).string().not_null())
                    .col(ColumnDef::new(AddressKorean::City).string().not_null())
                    .col(ColumnDef::new(AddressKorean::Street).string().not_null())
                    .col(ColumnDef::new(AddressKorean::ZipCode).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AddressKorean::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum AddressKorean {
    Table,
    Id,
    Country,
    City,
    Street,
    #[iden = "zipCode"]
    ZipCode,
}
