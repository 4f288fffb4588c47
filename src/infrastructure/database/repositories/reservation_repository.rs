//! SeaORM implementation of ReservationRepository
//!
//! The reserve path is one transaction around a conditional spot update:
//! `status = 'occupied' WHERE id = ? AND status = 'available'`. Exactly
//! one of two concurrent attempts can match; the loser reads the spot's
//! actual state and reports it. Any failure unwinds the flip so a spot is
//! never left occupied without a reservation row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::parking::SpotStatus;
use crate::domain::reservation::{
    CancelOutcome, Reservation, ReservationRepository, ReservationStatus, ReserveError,
    ReserveOutcome,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{reservation, spot};

use super::db_err;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        spot_id: m.spot_id,
        zone_id: m.zone_id,
        renter_name: m.renter_name,
        renter_email: m.renter_email,
        renter_phone: m.renter_phone,
        start_time: m.start_time,
        end_time: m.end_time,
        billable_hours: m.billable_hours,
        amount_cents: m.amount_cents,
        currency: m.currency,
        payment_id: m.payment_id,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(r: Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id),
        spot_id: Set(r.spot_id),
        zone_id: Set(r.zone_id),
        renter_name: Set(r.renter_name),
        renter_email: Set(r.renter_email),
        renter_phone: Set(r.renter_phone),
        start_time: Set(r.start_time),
        end_time: Set(r.end_time),
        billable_hours: Set(r.billable_hours),
        amount_cents: Set(r.amount_cents),
        currency: Set(r.currency),
        payment_id: Set(r.payment_id),
        status: Set(r.status.as_str().to_string()),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn reserve(
        &self,
        r: Reservation,
    ) -> DomainResult<Result<ReserveOutcome, ReserveError>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Idempotent replay: same payment_id returns the stored
        // reservation unchanged.
        if let Some(existing) = reservation::Entity::find()
            .filter(reservation::Column::PaymentId.eq(&r.payment_id))
            .one(&txn)
            .await
            .map_err(db_err)?
        {
            txn.rollback().await.map_err(db_err)?;
            debug!("Reservation replay for payment_id={}", existing.payment_id);
            return Ok(Ok(ReserveOutcome::Replayed(model_to_domain(existing))));
        }

        // Overlap look-ahead, layered on top of the status flip
        if let Some(conflicting) = reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(&r.spot_id))
            .filter(reservation::Column::Status.ne(ReservationStatus::Canceled.as_str()))
            .filter(reservation::Column::StartTime.lt(r.end_time))
            .filter(reservation::Column::EndTime.gt(r.start_time))
            .one(&txn)
            .await
            .map_err(db_err)?
        {
            txn.rollback().await.map_err(db_err)?;
            return Ok(Err(ReserveError::Overlap {
                conflicting_id: conflicting.id,
            }));
        }

        // Compare-and-swap on the spot status
        let flipped = spot::Entity::update_many()
            .col_expr(
                spot::Column::Status,
                Expr::value(SpotStatus::Occupied.as_str()),
            )
            .col_expr(spot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(spot::Column::Id.eq(&r.spot_id))
            .filter(spot::Column::Status.eq(SpotStatus::Available.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if flipped.rows_affected == 0 {
            let current = spot::Entity::find_by_id(&r.spot_id)
                .one(&txn)
                .await
                .map_err(db_err)?;
            txn.rollback().await.map_err(db_err)?;
            return Ok(Err(match current {
                None => ReserveError::SpotNotFound,
                Some(s) => ReserveError::SpotUnavailable(SpotStatus::from_str(&s.status)),
            }));
        }

        let created = model_to_domain(
            domain_to_active(r)
                .insert(&txn)
                .await
                .map_err(db_err)?,
        );

        txn.commit().await.map_err(db_err)?;
        debug!("Reservation {} created for spot {}", created.id, created.spot_id);
        Ok(Ok(ReserveOutcome::Created(created)))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find()
            .filter(reservation::Column::PaymentId.eq(payment_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_desc(reservation::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_overlapping(
        &self,
        spot_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .filter(reservation::Column::Status.ne(ReservationStatus::Canceled.as_str()))
            .filter(reservation::Column::StartTime.lt(end))
            .filter(reservation::Column::EndTime.gt(start))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn cancel(&self, id: &str) -> DomainResult<CancelOutcome> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(existing) = reservation::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        };

        if ReservationStatus::from_str(&existing.status) == ReservationStatus::Canceled {
            txn.rollback().await.map_err(db_err)?;
            return Ok(CancelOutcome::AlreadyCanceled);
        }

        // Release the spot and cancel the reservation together
        spot::Entity::update_many()
            .col_expr(
                spot::Column::Status,
                Expr::value(SpotStatus::Available.as_str()),
            )
            .col_expr(spot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(spot::Column::Id.eq(&existing.spot_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let mut active: reservation::ActiveModel = existing.into();
        active.status = Set(ReservationStatus::Canceled.as_str().to_string());
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!("Reservation {} canceled", id);
        Ok(CancelOutcome::Canceled)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::Set;
    use sea_orm_migration::MigratorTrait;

    use crate::domain::parking::SpotStatus;
    use crate::infrastructure::database::entities::{spot, zone};
    use crate::infrastructure::database::migrator::Migrator;

    async fn setup() -> (DatabaseConnection, SeaOrmReservationRepository) {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let now = Utc::now();
        zone::ActiveModel {
            id: Set("z1".to_string()),
            name: Set("North".to_string()),
            location: Set("west lot".to_string()),
            capacity: Set(1),
            zone_type: Set("standard".to_string()),
            hourly_rate_cents: Set(500),
            currency: Set("USD".to_string()),
            facilities: Set("[]".to_string()),
            is_active: Set(true),
            created_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        spot::ActiveModel {
            id: Set("s1".to_string()),
            zone_id: Set("z1".to_string()),
            label: Set("NORTH-1".to_string()),
            spot_type: Set("standard".to_string()),
            status: Set("available".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        let repo = SeaOrmReservationRepository::new(db.clone());
        (db, repo)
    }

    fn reservation(id: &str, spot_id: &str, payment_id: &str, offset_hours: i64) -> Reservation {
        let start = Utc::now() + Duration::hours(offset_hours);
        Reservation {
            id: id.to_string(),
            spot_id: spot_id.to_string(),
            zone_id: Some("z1".to_string()),
            renter_name: "Dana".to_string(),
            renter_email: None,
            renter_phone: None,
            start_time: start,
            end_time: start + Duration::hours(2),
            billable_hours: 2,
            amount_cents: 1000,
            currency: "USD".to_string(),
            payment_id: payment_id.to_string(),
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn spot_status(db: &DatabaseConnection) -> String {
        spot::Entity::find_by_id("s1")
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn reserve_flips_spot_to_occupied() {
        let (db, repo) = setup().await;

        let outcome = repo.reserve(reservation("r1", "s1", "p1", 1)).await.unwrap();
        assert!(matches!(outcome, Ok(ReserveOutcome::Created(_))));
        assert_eq!(spot_status(&db).await, "occupied");
    }

    #[tokio::test]
    async fn second_reserve_conflicts_with_current_status() {
        let (db, repo) = setup().await;

        repo.reserve(reservation("r1", "s1", "p1", 1))
            .await
            .unwrap()
            .unwrap();

        // different window, so the status flip (not the overlap check)
        // reports the conflict
        let outcome = repo.reserve(reservation("r2", "s1", "p2", 10)).await.unwrap();
        match outcome {
            Err(ReserveError::SpotUnavailable(status)) => {
                assert_eq!(status, SpotStatus::Occupied)
            }
            other => panic!("expected SpotUnavailable, got {other:?}"),
        }

        // exactly one reservation row exists
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
        assert_eq!(spot_status(&db).await, "occupied");
    }

    #[tokio::test]
    async fn overlap_lookahead_reports_conflicting_reservation() {
        let (db, repo) = setup().await;

        repo.reserve(reservation("r1", "s1", "p1", 1))
            .await
            .unwrap()
            .unwrap();
        repo.cancel("r1").await.unwrap();
        assert_eq!(spot_status(&db).await, "available");

        // completed (non-canceled) reservations still block their window
        let mut active: reservation::ActiveModel = reservation::Entity::find_by_id("r1")
            .one(&db)
            .await
            .unwrap()
            .unwrap()
            .into();
        active.status = Set("completed".to_string());
        active.update(&db).await.unwrap();

        let outcome = repo.reserve(reservation("r2", "s1", "p2", 2)).await.unwrap();
        match outcome {
            Err(ReserveError::Overlap { conflicting_id }) => assert_eq!(conflicting_id, "r1"),
            other => panic!("expected Overlap, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn replay_returns_existing_without_new_row() {
        let (_db, repo) = setup().await;

        let first = match repo
            .reserve(reservation("r1", "s1", "p1", 1))
            .await
            .unwrap()
            .unwrap()
        {
            ReserveOutcome::Created(r) => r,
            other => panic!("expected Created, got {other:?}"),
        };

        let replay = repo.reserve(reservation("r2", "s1", "p1", 5)).await.unwrap();
        match replay {
            Ok(ReserveOutcome::Replayed(r)) => assert_eq!(r.id, first.id),
            other => panic!("expected Replayed, got {other:?}"),
        }
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_spot_is_not_found() {
        let (_db, repo) = setup().await;
        let outcome = repo.reserve(reservation("r1", "ghost", "p1", 1)).await.unwrap();
        assert!(matches!(outcome, Err(ReserveError::SpotNotFound)));
    }

    #[tokio::test]
    async fn cancel_releases_spot_and_is_idempotent() {
        let (db, repo) = setup().await;

        repo.reserve(reservation("r1", "s1", "p1", 1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(repo.cancel("r1").await.unwrap(), CancelOutcome::Canceled);
        assert_eq!(spot_status(&db).await, "available");

        // second cancel is a no-op success
        assert_eq!(
            repo.cancel("r1").await.unwrap(),
            CancelOutcome::AlreadyCanceled
        );
        assert_eq!(spot_status(&db).await, "available");
    }

    #[tokio::test]
    async fn cancel_unknown_reservation_is_not_found() {
        let (_db, repo) = setup().await;
        assert!(matches!(
            repo.cancel("ghost").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn maintenance_spot_reports_its_status() {
        let (db, repo) = setup().await;

        let mut active: spot::ActiveModel = spot::Entity::find_by_id("s1")
            .one(&db)
            .await
            .unwrap()
            .unwrap()
            .into();
        active.status = Set("maintenance".to_string());
        active.update(&db).await.unwrap();

        let outcome = repo.reserve(reservation("r1", "s1", "p1", 1)).await.unwrap();
        match outcome {
            Err(ReserveError::SpotUnavailable(status)) => {
                assert_eq!(status, SpotStatus::Maintenance)
            }
            other => panic!("expected SpotUnavailable, got {other:?}"),
        }
    }
}
