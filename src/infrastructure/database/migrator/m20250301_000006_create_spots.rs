//! Create spots table
//!
//! One row per unit of zone capacity; label unique within a zone.

use sea_orm_migration::prelude::*;

use super::m20250301_000005_create_zones::Zones;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Spots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Spots::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Spots::ZoneId).string().not_null())
                    .col(ColumnDef::new(Spots::Label).string().not_null())
                    .col(
                        ColumnDef::new(Spots::SpotType)
                            .string()
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(Spots::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(Spots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Spots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_spots_zone")
                            .from(Spots::Table, Spots::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spots_zone_label")
                    .table(Spots::Table)
                    .col(Spots::ZoneId)
                    .col(Spots::Label)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spots_status")
                    .table(Spots::Table)
                    .col(Spots::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Spots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Spots {
    Table,
    Id,
    ZoneId,
    Label,
    SpotType,
    Status,
    CreatedAt,
    UpdatedAt,
}
