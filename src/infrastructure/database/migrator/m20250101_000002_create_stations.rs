//! Create stations table
//!
//! Stations carry the discount state used by the pricing engine.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stations::Name).string().not_null())
                    .col(
                        ColumnDef::new(Stations::Latitude)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Stations::Longitude)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Stations::OperatorId).big_integer())
                    .col(
                        ColumnDef::new(Stations::DiscountActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stations::DiscountValue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Stations::DiscountStart).time())
                    .col(ColumnDef::new(Stations::DiscountEnd).time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_operator")
                            .from(Stations::Table, Stations::OperatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_name")
                    .table(Stations::Table)
                    .col(Stations::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Stations {
    Table,
    Id,
    Name,
    Latitude,
    Longitude,
    OperatorId,
    DiscountActive,
    DiscountValue,
    DiscountStart,
    DiscountEnd,
}
