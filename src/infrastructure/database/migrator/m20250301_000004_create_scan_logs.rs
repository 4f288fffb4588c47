//! Create scan_logs table
//!
//! Append-only log of QR scans; the duplicate-scan guard checks it in
//! addition to the ticket's checked_in flag.

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_tickets::Tickets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScanLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScanLogs::TicketId).string().not_null())
                    .col(ColumnDef::new(ScanLogs::CounterLabel).string().not_null())
                    .col(ColumnDef::new(ScanLogs::ScannedBy).string())
                    .col(
                        ColumnDef::new(ScanLogs::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_logs_ticket")
                            .from(ScanLogs::Table, ScanLogs::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scan_logs_ticket")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::TicketId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScanLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ScanLogs {
    Table,
    Id,
    TicketId,
    CounterLabel,
    ScannedBy,
    ScannedAt,
}
