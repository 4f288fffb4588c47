//! Create incidents table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incidents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incidents::Title).string().not_null())
                    .col(ColumnDef::new(Incidents::Description).text().not_null())
                    .col(
                        ColumnDef::new(Incidents::Severity)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Incidents::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Incidents::Location).string())
                    .col(ColumnDef::new(Incidents::ReportedBy).string().not_null())
                    .col(ColumnDef::new(Incidents::ImageUrl).string())
                    .col(
                        ColumnDef::new(Incidents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Incidents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_status")
                    .table(Incidents::Table)
                    .col(Incidents::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Incidents {
    Table,
    Id,
    Title,
    Description,
    Severity,
    Status,
    Location,
    ReportedBy,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
