//! Create slots table
//!
//! The `reserved` flag is the single source of truth for availability;
//! the claim path updates it with a conditional UPDATE.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Slots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Slots::StationId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Slots::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Slots::Latitude).double())
                    .col(ColumnDef::new(Slots::Longitude).double())
                    .col(
                        ColumnDef::new(Slots::ChargingType)
                            .string()
                            .not_null()
                            .default("NORMAL"),
                    )
                    .col(ColumnDef::new(Slots::Power).string())
                    .col(
                        ColumnDef::new(Slots::Reserved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_slots_station")
                            .from(Slots::Table, Slots::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slots_station")
                    .table(Slots::Table)
                    .col(Slots::StationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slots_reserved")
                    .table(Slots::Table)
                    .col(Slots::Reserved)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Slots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Slots {
    Table,
    Id,
    StationId,
    Name,
    Latitude,
    Longitude,
    ChargingType,
    Power,
    Reserved,
}
