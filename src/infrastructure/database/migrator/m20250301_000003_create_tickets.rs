//! Create tickets table
//!
//! `payment_id` is the checkout idempotency key. A partial unique index
//! limits each national ID to one individual-category ticket without
//! constraining family tickets.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_counters::Counters;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::Nic).string().not_null())
                    .col(ColumnDef::new(Tickets::FullName).string().not_null())
                    .col(ColumnDef::new(Tickets::Email).string().not_null())
                    .col(ColumnDef::new(Tickets::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Tickets::Category)
                            .string()
                            .not_null()
                            .default("individual"),
                    )
                    .col(
                        ColumnDef::new(Tickets::Count)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Tickets::PaymentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Tickets::PaymentStatus)
                            .string()
                            .not_null()
                            .default("paid"),
                    )
                    .col(
                        ColumnDef::new(Tickets::AmountCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tickets::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(Tickets::CardMasked).string())
                    .col(ColumnDef::new(Tickets::QrPayload).text().not_null())
                    .col(ColumnDef::new(Tickets::CounterId).string())
                    .col(
                        ColumnDef::new(Tickets::CounterLabel)
                            .string()
                            .not_null()
                            .default("unassigned"),
                    )
                    .col(
                        ColumnDef::new(Tickets::CheckedIn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tickets::CheckedInAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_counter")
                            .from(Tickets::Table, Tickets::CounterId)
                            .to(Counters::Table, Counters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_nic")
                    .table(Tickets::Table)
                    .col(Tickets::Nic)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_counter")
                    .table(Tickets::Table)
                    .col(Tickets::CounterId)
                    .to_owned(),
            )
            .await?;

        // Uniqueness scoped to the individual category; sea-query has no
        // builder for partial indexes, so raw SQL it is.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_tickets_individual_nic \
                 ON tickets (nic) WHERE category = 'individual'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tickets {
    Table,
    Id,
    Nic,
    FullName,
    Email,
    Phone,
    Category,
    Count,
    PaymentId,
    PaymentStatus,
    AmountCents,
    Currency,
    CardMasked,
    QrPayload,
    CounterId,
    CounterLabel,
    CheckedIn,
    CheckedInAt,
    CreatedAt,
}
