//! Reservation service
//!
//! Wraps the atomic spot-occupancy transition: billing computation up
//! front, then one transactional compare-and-swap in the repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::domain::reservation::{
    billable_hours, CancelOutcome, Reservation, ReservationStatus, ReserveError, ReserveOutcome,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, ReservationEvent, SharedEventBus};

/// Reservation request, validated at the HTTP boundary.
pub struct NewReservation {
    pub spot_id: String,
    pub renter_name: String,
    pub renter_email: Option<String>,
    pub renter_phone: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub payment_id: String,
    /// Explicit price; wins over the zone's hourly rate
    pub price_cents: Option<i64>,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self { repos, event_bus }
    }

    /// Reserve a spot for a time window. Replaying the same payment_id
    /// returns the stored reservation unchanged.
    pub async fn create(&self, req: NewReservation) -> DomainResult<Reservation> {
        let hours = billable_hours(req.start_time, req.end_time)?;

        // Zone snapshot and rate for billing; existence is re-checked by
        // the conditional update inside the transaction.
        let Some(spot) = self.repos.parking().find_spot(&req.spot_id).await? else {
            return Err(DomainError::NotFound {
                entity: "ParkingSpot",
                field: "id",
                value: req.spot_id,
            });
        };
        let zone = self.repos.parking().find_zone(&spot.zone_id).await?;

        let (rate, currency) = zone
            .as_ref()
            .map(|z| (z.hourly_rate_cents, z.currency.clone()))
            .unwrap_or((0, "USD".to_string()));
        let amount_cents = req.price_cents.unwrap_or(rate * hours);

        let now = Utc::now();
        let reservation = Reservation {
            id: uuid::Uuid::new_v4().to_string(),
            spot_id: spot.id.clone(),
            zone_id: zone.map(|z| z.id),
            renter_name: req.renter_name,
            renter_email: req.renter_email,
            renter_phone: req.renter_phone,
            start_time: req.start_time,
            end_time: req.end_time,
            billable_hours: hours,
            amount_cents,
            currency,
            payment_id: req.payment_id,
            status: ReservationStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        match self.repos.reservations().reserve(reservation).await? {
            Ok(ReserveOutcome::Created(created)) => {
                info!(
                    "Reserved spot {} for {} hours ({} {})",
                    created.spot_id, created.billable_hours, created.amount_cents, created.currency
                );
                metrics::counter!("reservations_total").increment(1);
                self.event_bus
                    .publish(Event::ReservationConfirmed(ReservationEvent {
                        reservation_id: created.id.clone(),
                        spot_id: created.spot_id.clone(),
                        zone_id: created.zone_id.clone(),
                        timestamp: now,
                    }));
                Ok(created)
            }
            Ok(ReserveOutcome::Replayed(existing)) => Ok(existing),
            Err(ReserveError::SpotNotFound) => Err(DomainError::NotFound {
                entity: "ParkingSpot",
                field: "id",
                value: spot.id,
            }),
            Err(ReserveError::SpotUnavailable(status)) => Err(DomainError::Conflict(format!(
                "Spot {} is not available (status: {})",
                spot.id, status
            ))),
            Err(ReserveError::Overlap { conflicting_id }) => Err(DomainError::Conflict(format!(
                "Requested window overlaps reservation {}",
                conflicting_id
            ))),
        }
    }

    /// Cancel a reservation, releasing its spot. Canceling twice is a
    /// no-op success.
    pub async fn cancel(&self, id: &str) -> DomainResult<Reservation> {
        let outcome = self.repos.reservations().cancel(id).await?;

        let reservation = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;

        if outcome == CancelOutcome::Canceled {
            metrics::counter!("reservations_canceled_total").increment(1);
            self.event_bus
                .publish(Event::ReservationCanceled(ReservationEvent {
                    reservation_id: reservation.id.clone(),
                    spot_id: reservation.spot_id.clone(),
                    zone_id: reservation.zone_id.clone(),
                    timestamp: Utc::now(),
                }));
        }

        Ok(reservation)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn list(&self) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_all().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm_migration::MigratorTrait;

    use crate::domain::parking::{ParkingSpot, ParkingZone, SpotStatus, SpotType};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::notifications::create_event_bus;

    async fn service() -> (ReservationService, Arc<SeaOrmRepositoryProvider>) {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        let now = Utc::now();
        let zone = ParkingZone {
            id: "z1".to_string(),
            name: "North".to_string(),
            location: "west lot".to_string(),
            capacity: 1,
            zone_type: SpotType::Standard,
            hourly_rate_cents: 500,
            currency: "USD".to_string(),
            facilities: vec![],
            is_active: true,
            created_at: now,
        };
        let spot = ParkingSpot {
            id: "s1".to_string(),
            zone_id: "z1".to_string(),
            label: "NORTH-1".to_string(),
            spot_type: SpotType::Standard,
            status: SpotStatus::Available,
            created_at: now,
            updated_at: now,
        };
        repos
            .parking()
            .save_zone_with_spots(zone, vec![spot])
            .await
            .unwrap();

        (
            ReservationService::new(repos.clone(), create_event_bus()),
            repos,
        )
    }

    fn request(payment_id: &str, minutes: i64, price_cents: Option<i64>) -> NewReservation {
        let start = Utc::now() + Duration::hours(1);
        NewReservation {
            spot_id: "s1".to_string(),
            renter_name: "Dana".to_string(),
            renter_email: None,
            renter_phone: None,
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            payment_id: payment_id.to_string(),
            price_cents,
        }
    }

    #[tokio::test]
    async fn amount_is_rate_times_rounded_hours() {
        let (service, _repos) = service().await;
        // 61 minutes round up to 2 billable hours
        let reservation = service.create(request("p1", 61, None)).await.unwrap();
        assert_eq!(reservation.billable_hours, 2);
        assert_eq!(reservation.amount_cents, 1000);
        assert_eq!(reservation.currency, "USD");
        assert_eq!(reservation.zone_id.as_deref(), Some("z1"));
    }

    #[tokio::test]
    async fn explicit_price_wins_over_rate() {
        let (service, _repos) = service().await;
        let reservation = service.create(request("p1", 60, Some(175))).await.unwrap();
        assert_eq!(reservation.billable_hours, 1);
        assert_eq!(reservation.amount_cents, 175);
    }

    #[tokio::test]
    async fn empty_window_is_rejected_before_any_write() {
        let (service, repos) = service().await;
        let err = service.create(request("p1", 0, None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let spot = repos.parking().find_spot("s1").await.unwrap().unwrap();
        assert_eq!(spot.status, SpotStatus::Available);
    }

    #[tokio::test]
    async fn cancel_then_recancel_is_noop_success() {
        let (service, repos) = service().await;
        let reservation = service.create(request("p1", 120, None)).await.unwrap();

        let canceled = service.cancel(&reservation.id).await.unwrap();
        assert_eq!(canceled.status, ReservationStatus::Canceled);
        assert_eq!(
            repos.parking().find_spot("s1").await.unwrap().unwrap().status,
            SpotStatus::Available
        );

        let again = service.cancel(&reservation.id).await.unwrap();
        assert_eq!(again.status, ReservationStatus::Canceled);
    }

    #[tokio::test]
    async fn unknown_spot_is_not_found() {
        let (service, _repos) = service().await;
        let mut req = request("p1", 60, None);
        req.spot_id = "ghost".to_string();
        assert!(matches!(
            service.create(req).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }
}
