//! Create counters table
//!
//! Entry/exit checkpoints with a capacity and a live load figure mutated
//! by ticket issuance and check-in scans.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Counters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Counters::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Counters::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Counters::Entrance).string().not_null())
                    .col(
                        ColumnDef::new(Counters::Status)
                            .string()
                            .not_null()
                            .default("entry"),
                    )
                    .col(
                        ColumnDef::new(Counters::Capacity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Counters::Load)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Counters::Staff).string())
                    .col(
                        ColumnDef::new(Counters::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Counters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Counters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_counters_active")
                    .table(Counters::Table)
                    .col(Counters::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Counters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Counters {
    Table,
    Id,
    Name,
    Entrance,
    Status,
    Capacity,
    Load,
    Staff,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
