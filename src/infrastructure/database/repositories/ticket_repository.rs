//! SeaORM implementation of TicketRepository
//!
//! Check-in is one transaction: scan-log insert, checked_in flag flip and
//! counter load release commit together or not at all. The flag flip is a
//! conditional update, so a raced duplicate scan loses cleanly inside the
//! transaction even when both requests passed the handler-level guards.

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::ticket::{
    CheckInRecord, Payment, PaymentStatus, Ticket, TicketCategory, TicketRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{counter, scan_log, ticket};

use super::db_err;

pub struct SeaOrmTicketRepository {
    db: DatabaseConnection,
}

impl SeaOrmTicketRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: ticket::Model) -> Ticket {
    Ticket {
        id: m.id,
        nic: m.nic,
        full_name: m.full_name,
        email: m.email,
        phone: m.phone,
        category: TicketCategory::from_str(&m.category),
        count: m.count,
        payment: Payment {
            payment_id: m.payment_id,
            status: PaymentStatus::from_str(&m.payment_status),
            amount_cents: m.amount_cents,
            currency: m.currency,
            card_masked: m.card_masked,
        },
        qr_payload: m.qr_payload,
        counter_id: m.counter_id,
        counter_label: m.counter_label,
        checked_in: m.checked_in,
        checked_in_at: m.checked_in_at,
        created_at: m.created_at,
    }
}

fn domain_to_active(t: Ticket) -> ticket::ActiveModel {
    ticket::ActiveModel {
        id: Set(t.id),
        nic: Set(t.nic),
        full_name: Set(t.full_name),
        email: Set(t.email),
        phone: Set(t.phone),
        category: Set(t.category.as_str().to_string()),
        count: Set(t.count),
        payment_id: Set(t.payment.payment_id),
        payment_status: Set(t.payment.status.as_str().to_string()),
        amount_cents: Set(t.payment.amount_cents),
        currency: Set(t.payment.currency),
        card_masked: Set(t.payment.card_masked),
        qr_payload: Set(t.qr_payload),
        counter_id: Set(t.counter_id),
        counter_label: Set(t.counter_label),
        checked_in: Set(t.checked_in),
        checked_in_at: Set(t.checked_in_at),
        created_at: Set(t.created_at),
    }
}

// ── TicketRepository impl ───────────────────────────────────────

#[async_trait]
impl TicketRepository for SeaOrmTicketRepository {
    async fn save(&self, t: Ticket) -> DomainResult<()> {
        debug!("Saving ticket: {} ({})", t.id, t.payment.payment_id);
        domain_to_active(t).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Ticket>> {
        let model = ticket::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> DomainResult<Option<Ticket>> {
        let model = ticket::Entity::find()
            .filter(ticket::Column::PaymentId.eq(payment_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_individual_by_nic(&self, nic: &str) -> DomainResult<Option<Ticket>> {
        let model = ticket::Entity::find()
            .filter(ticket::Column::Nic.eq(nic))
            .filter(ticket::Column::Category.eq(TicketCategory::Individual.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Ticket>> {
        let models = ticket::Entity::find()
            .order_by_desc(ticket::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_page(&self, page: u64, per_page: u64) -> DomainResult<(Vec<Ticket>, u64)> {
        let paginator = ticket::Entity::find()
            .order_by_desc(ticket::Column::CreatedAt)
            .paginate(&self.db, per_page.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn has_scan(&self, ticket_id: &str) -> DomainResult<bool> {
        let count = scan_log::Entity::find()
            .filter(scan_log::Column::TicketId.eq(ticket_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn check_in(&self, record: CheckInRecord) -> DomainResult<Ticket> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(existing) = ticket::Entity::find_by_id(&record.ticket_id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::NotFound {
                entity: "Ticket",
                field: "id",
                value: record.ticket_id,
            });
        };

        // Conditional flag flip; a concurrent duplicate scan matches zero
        // rows here and the whole unit unwinds.
        let flipped = ticket::Entity::update_many()
            .col_expr(ticket::Column::CheckedIn, Expr::value(true))
            .col_expr(ticket::Column::CheckedInAt, Expr::value(record.scanned_at))
            .filter(ticket::Column::Id.eq(&record.ticket_id))
            .filter(ticket::Column::CheckedIn.eq(false))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if flipped.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::Conflict(format!(
                "Ticket {} is already checked in",
                record.ticket_id
            )));
        }

        scan_log::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            ticket_id: Set(record.ticket_id.clone()),
            counter_label: Set(record.counter_label),
            scanned_by: Set(record.scanned_by),
            scanned_at: Set(record.scanned_at),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        // Release the assigned counter's load, floored at zero
        if let Some(counter_id) = &existing.counter_id {
            let released = counter::Entity::update_many()
                .col_expr(
                    counter::Column::Load,
                    Expr::col(counter::Column::Load).sub(existing.count),
                )
                .col_expr(counter::Column::UpdatedAt, Expr::value(record.scanned_at))
                .filter(counter::Column::Id.eq(counter_id))
                .filter(counter::Column::Load.gte(existing.count))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if released.rows_affected == 0 {
                counter::Entity::update_many()
                    .col_expr(counter::Column::Load, Expr::value(0))
                    .col_expr(counter::Column::UpdatedAt, Expr::value(record.scanned_at))
                    .filter(counter::Column::Id.eq(counter_id))
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;
            }
        }

        let updated = ticket::Entity::find_by_id(&record.ticket_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Ticket",
                field: "id",
                value: record.ticket_id.clone(),
            })?;

        txn.commit().await.map_err(db_err)?;
        debug!("Ticket {} checked in", record.ticket_id);
        Ok(model_to_domain(updated))
    }

    async fn counts(&self) -> DomainResult<(u64, u64)> {
        let total = ticket::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)?;
        let checked_in = ticket::Entity::find()
            .filter(ticket::Column::CheckedIn.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok((checked_in, total))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::DatabaseConnection;
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;

    async fn setup() -> (DatabaseConnection, SeaOrmTicketRepository) {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        counter::ActiveModel {
            id: Set("c1".to_string()),
            name: Set("Gate A".to_string()),
            entrance: Set("north".to_string()),
            status: Set("entry".to_string()),
            capacity: Set(10),
            load: Set(4),
            staff: Set(None),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap();

        let repo = SeaOrmTicketRepository::new(db.clone());
        (db, repo)
    }

    fn ticket(id: &str, payment_id: &str, nic: &str, category: TicketCategory, count: i64) -> Ticket {
        Ticket {
            id: id.to_string(),
            nic: nic.to_string(),
            full_name: "Dana Silva".to_string(),
            email: "dana@example.com".to_string(),
            phone: "0771234567".to_string(),
            category,
            count,
            payment: Payment {
                payment_id: payment_id.to_string(),
                status: PaymentStatus::Paid,
                amount_cents: 2500,
                currency: "USD".to_string(),
                card_masked: Some("**** **** **** 4242".to_string()),
            },
            qr_payload: format!("CF|v=1|key={nic}|type=I|count={count}|counter=Gate%20A|pid={payment_id}"),
            counter_id: Some("c1".to_string()),
            counter_label: "Gate A".to_string(),
            checked_in: false,
            checked_in_at: None,
            created_at: Utc::now(),
        }
    }

    async fn counter_load(db: &DatabaseConnection) -> i64 {
        counter::Entity::find_by_id("c1")
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .load
    }

    fn record(ticket_id: &str) -> CheckInRecord {
        CheckInRecord {
            ticket_id: ticket_id.to_string(),
            counter_label: "Gate A".to_string(),
            scanned_by: Some("staff-1".to_string()),
            scanned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn check_in_releases_load_once() {
        let (db, repo) = setup().await;
        repo.save(ticket("t1", "p1", "nic-1", TicketCategory::Family, 3))
            .await
            .unwrap();

        let checked = repo.check_in(record("t1")).await.unwrap();
        assert!(checked.checked_in);
        assert!(checked.checked_in_at.is_some());
        assert_eq!(counter_load(&db).await, 1);
        assert!(repo.has_scan("t1").await.unwrap());

        // duplicate scan: conflict, no further load change
        let err = repo.check_in(record("t1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(counter_load(&db).await, 1);
    }

    #[tokio::test]
    async fn check_in_floors_load_at_zero() {
        let (db, repo) = setup().await;
        // party larger than the remaining load
        repo.save(ticket("t1", "p1", "nic-1", TicketCategory::Family, 9))
            .await
            .unwrap();

        repo.check_in(record("t1")).await.unwrap();
        assert_eq!(counter_load(&db).await, 0);
    }

    #[tokio::test]
    async fn check_in_unknown_ticket_is_not_found() {
        let (_db, repo) = setup().await;
        assert!(matches!(
            repo.check_in(record("ghost")).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn payment_id_is_unique() {
        let (_db, repo) = setup().await;
        repo.save(ticket("t1", "p1", "nic-1", TicketCategory::Family, 2))
            .await
            .unwrap();
        assert!(repo
            .save(ticket("t2", "p1", "nic-2", TicketCategory::Family, 2))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn individual_nic_is_unique_but_family_is_not() {
        let (_db, repo) = setup().await;
        repo.save(ticket("t1", "p1", "nic-1", TicketCategory::Individual, 1))
            .await
            .unwrap();

        // second individual for the same NIC trips the partial index
        assert!(repo
            .save(ticket("t2", "p2", "nic-1", TicketCategory::Individual, 1))
            .await
            .is_err());

        // family tickets for the same NIC are fine
        repo.save(ticket("t3", "p3", "nic-1", TicketCategory::Family, 4))
            .await
            .unwrap();

        let found = repo.find_individual_by_nic("nic-1").await.unwrap().unwrap();
        assert_eq!(found.id, "t1");
    }

    #[tokio::test]
    async fn counts_track_checked_in() {
        let (_db, repo) = setup().await;
        repo.save(ticket("t1", "p1", "nic-1", TicketCategory::Family, 2))
            .await
            .unwrap();
        repo.save(ticket("t2", "p2", "nic-2", TicketCategory::Family, 2))
            .await
            .unwrap();

        repo.check_in(record("t1")).await.unwrap();
        assert_eq!(repo.counts().await.unwrap(), (1, 2));
    }
}
