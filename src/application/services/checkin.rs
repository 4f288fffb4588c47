//! Check-in service
//!
//! Resolves a scanned QR payload to its ticket and records the entry.
//! Duplicate scans are rejected on two independent signals: the ticket's
//! checked_in flag and the scan log. Either one alone could be bypassed
//! by crafted requests hitting different code paths, so both are checked.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::domain::ticket::{CheckInRecord, QrPayload, Ticket};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, SharedEventBus, TicketCheckedInEvent};

pub struct CheckinService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
}

impl CheckinService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self { repos, event_bus }
    }

    /// Scan a raw QR string at a counter. Returns the checked-in ticket.
    pub async fn scan(
        &self,
        raw_qr: &str,
        counter_label: Option<String>,
        scanned_by: Option<String>,
    ) -> DomainResult<Ticket> {
        let payload = QrPayload::parse(raw_qr)?;

        let Some(ticket) = self
            .repos
            .tickets()
            .find_by_payment_id(&payload.payment_id)
            .await?
        else {
            return Err(DomainError::NotFound {
                entity: "Ticket",
                field: "payment_id",
                value: payload.payment_id,
            });
        };

        if ticket.checked_in {
            return Err(DomainError::Conflict(format!(
                "Ticket {} is already checked in",
                ticket.id
            )));
        }
        if self.repos.tickets().has_scan(&ticket.id).await? {
            return Err(DomainError::Conflict(format!(
                "Ticket {} already has a scan recorded",
                ticket.id
            )));
        }

        let label = counter_label.unwrap_or_else(|| ticket.counter_label.clone());
        let now = Utc::now();

        let checked_in = self
            .repos
            .tickets()
            .check_in(CheckInRecord {
                ticket_id: ticket.id.clone(),
                counter_label: label.clone(),
                scanned_by,
                scanned_at: now,
            })
            .await?;

        info!(
            "Ticket {} checked in at {} (party of {})",
            checked_in.id, label, checked_in.count
        );
        metrics::counter!("checkins_total").increment(1);
        self.event_bus
            .publish(Event::TicketCheckedIn(TicketCheckedInEvent {
                ticket_id: checked_in.id.clone(),
                counter_label: label,
                count: checked_in.count,
                timestamp: now,
            }));

        Ok(checked_in)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc as ChronoUtc;
    use sea_orm_migration::MigratorTrait;

    use crate::application::services::checkout::NewCheckout;
    use crate::application::{CheckoutService, CounterAssignmentService};
    use crate::domain::counter::{Counter, CounterStatus};
    use crate::domain::ticket::TicketCategory;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::notifications::create_event_bus;

    async fn services() -> (CheckoutService, CheckinService, Arc<SeaOrmRepositoryProvider>) {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        let bus = create_event_bus();
        let assignment = Arc::new(CounterAssignmentService::new(repos.clone()));
        let checkout = CheckoutService::new(repos.clone(), assignment, bus.clone());
        let checkin = CheckinService::new(repos.clone(), bus);

        repos
            .counters()
            .save(Counter {
                id: "c1".to_string(),
                name: "Gate A".to_string(),
                entrance: "north".to_string(),
                status: Some(CounterStatus::Entry),
                capacity: 10,
                load: 0,
                staff: None,
                is_active: true,
                created_at: ChronoUtc::now(),
                updated_at: ChronoUtc::now(),
            })
            .await
            .unwrap();

        (checkout, checkin, repos)
    }

    async fn issue(checkout: &CheckoutService, payment_id: &str, count: i64) -> Ticket {
        checkout
            .checkout(NewCheckout {
                nic: format!("nic-{payment_id}"),
                full_name: "Dana Silva".to_string(),
                email: "dana@example.com".to_string(),
                phone: "0771234567".to_string(),
                category: TicketCategory::Family,
                count,
                password: None,
                payment_id: payment_id.to_string(),
                amount_cents: 2500,
                currency: "USD".to_string(),
                card_number: None,
            })
            .await
            .unwrap()
            .ticket
    }

    #[tokio::test]
    async fn scan_checks_in_and_releases_load_once() {
        let (checkout, checkin, repos) = services().await;
        let ticket = issue(&checkout, "p1", 4).await;
        assert_eq!(
            repos.counters().find_by_id("c1").await.unwrap().unwrap().load,
            4
        );

        let checked = checkin
            .scan(&ticket.qr_payload, None, Some("staff-1".to_string()))
            .await
            .unwrap();
        assert!(checked.checked_in);
        assert_eq!(
            repos.counters().find_by_id("c1").await.unwrap().unwrap().load,
            0
        );

        // second scan: conflict, load unchanged
        let err = checkin
            .scan(&ticket.qr_payload, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(
            repos.counters().find_by_id("c1").await.unwrap().unwrap().load,
            0
        );
    }

    #[tokio::test]
    async fn scan_of_unknown_payment_is_not_found() {
        let (_checkout, checkin, _repos) = services().await;
        let err = checkin
            .scan("CF|v=1|type=I|count=1|pid=ghost", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn garbage_qr_is_rejected() {
        let (_checkout, checkin, _repos) = services().await;
        let err = checkin.scan("totally-not-a-qr", None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
