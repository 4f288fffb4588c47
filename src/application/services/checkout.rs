//! Checkout service
//!
//! Registers an attendee, records the payment sub-record, assigns an
//! entry counter and issues the QR ticket. Replaying a checkout with the
//! same payment_id returns the stored ticket without touching any
//! counter's load.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::domain::ticket::{Payment, PaymentStatus, QrPayload, Ticket, TicketCategory};
use crate::domain::user::{User, UserRole};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::qr::{self, QrImage};
use crate::notifications::{Event, SharedEventBus, TicketIssuedEvent};

use super::counter_assignment::CounterAssignmentService;

/// Checkout request, validated at the HTTP boundary.
pub struct NewCheckout {
    pub nic: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub category: TicketCategory,
    pub count: i64,
    /// Creates an attendee dashboard account when present
    pub password: Option<String>,
    pub payment_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub card_number: Option<String>,
}

/// Issued (or replayed) ticket with its rendered QR image.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub ticket: Ticket,
    pub qr: QrImage,
    pub replayed: bool,
}

pub struct CheckoutService {
    repos: Arc<dyn RepositoryProvider>,
    assignment: Arc<CounterAssignmentService>,
    event_bus: SharedEventBus,
}

impl CheckoutService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        assignment: Arc<CounterAssignmentService>,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            repos,
            assignment,
            event_bus,
        }
    }

    pub async fn checkout(&self, req: NewCheckout) -> DomainResult<CheckoutOutcome> {
        // Idempotent replay: same payment_id yields the same ticket and
        // no second load increment.
        if let Some(existing) = self
            .repos
            .tickets()
            .find_by_payment_id(&req.payment_id)
            .await?
        {
            info!("Checkout replay for payment_id={}", req.payment_id);
            let qr = qr::render_data_url(&existing.qr_payload)
                .map_err(|e| DomainError::Validation(e.to_string()))?;
            return Ok(CheckoutOutcome {
                ticket: existing,
                qr,
                replayed: true,
            });
        }

        let count = Ticket::effective_count(req.category, req.count);

        // One individual ticket per national ID; the partial unique index
        // backstops this check.
        if req.category == TicketCategory::Individual {
            if let Some(existing) = self.repos.tickets().find_individual_by_nic(&req.nic).await? {
                return Err(DomainError::Conflict(format!(
                    "An individual ticket for NIC {} already exists (ticket {})",
                    req.nic, existing.id
                )));
            }
        }

        // Pick a counter and record the load. This increment and the
        // ticket insert below are separate writes: a crash in between
        // leaves the load inflated with no compensating ticket.
        let counter = self.assignment.assign(count).await?;

        let payload = QrPayload::new(
            req.nic.clone(),
            req.category,
            count,
            counter.name.clone(),
            req.payment_id.clone(),
        )
        .encode();

        let qr = qr::render_data_url(&payload)
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let now = Utc::now();
        let ticket = Ticket {
            id: uuid::Uuid::new_v4().to_string(),
            nic: req.nic,
            full_name: req.full_name,
            email: req.email.clone(),
            phone: req.phone,
            category: req.category,
            count,
            payment: Payment {
                payment_id: req.payment_id,
                status: PaymentStatus::Paid,
                amount_cents: req.amount_cents,
                currency: req.currency,
                card_masked: req.card_number.as_deref().map(Ticket::mask_card),
            },
            qr_payload: payload,
            counter_id: Some(counter.id.clone()),
            counter_label: counter.name.clone(),
            checked_in: false,
            checked_in_at: None,
            created_at: now,
        };

        self.repos.tickets().save(ticket.clone()).await?;

        if let Some(password) = req.password.as_deref() {
            self.create_attendee_account(&req.email, password).await;
        }

        metrics::counter!("tickets_issued_total").increment(1);
        self.event_bus.publish(Event::TicketIssued(TicketIssuedEvent {
            ticket_id: ticket.id.clone(),
            counter_id: ticket.counter_id.clone(),
            count,
            timestamp: now,
        }));

        Ok(CheckoutOutcome {
            ticket,
            qr,
            replayed: false,
        })
    }

    /// Best-effort attendee account creation; checkout does not fail when
    /// the e-mail is already registered.
    async fn create_attendee_account(&self, email: &str, password: &str) {
        match self.repos.users().find_by_email(email).await {
            Ok(Some(_)) => {
                info!("Attendee account for {} already exists", email);
            }
            Ok(None) => {
                let hash = match hash_password(password) {
                    Ok(hash) => hash,
                    Err(e) => {
                        warn!("Failed to hash attendee password: {}", e);
                        return;
                    }
                };
                let now = Utc::now();
                let user = User {
                    id: uuid::Uuid::new_v4().to_string(),
                    username: email.to_string(),
                    email: email.to_string(),
                    password_hash: hash,
                    role: UserRole::Attendee,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                    last_login_at: None,
                };
                if let Err(e) = self.repos.users().save(user).await {
                    warn!("Failed to create attendee account for {}: {}", email, e);
                }
            }
            Err(e) => warn!("Attendee account lookup failed for {}: {}", email, e),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm_migration::MigratorTrait;

    use crate::domain::counter::{Counter, CounterStatus};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::notifications::create_event_bus;

    async fn service() -> (CheckoutService, Arc<SeaOrmRepositoryProvider>) {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        let assignment = Arc::new(CounterAssignmentService::new(repos.clone()));
        let service = CheckoutService::new(repos.clone(), assignment, create_event_bus());
        (service, repos)
    }

    async fn add_counter(repos: &SeaOrmRepositoryProvider, id: &str, capacity: i64) {
        use crate::domain::RepositoryProvider;
        repos
            .counters()
            .save(Counter {
                id: id.to_string(),
                name: format!("Gate {id}"),
                entrance: "north".to_string(),
                status: Some(CounterStatus::Entry),
                capacity,
                load: 0,
                staff: None,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    fn request(payment_id: &str, nic: &str, category: TicketCategory, count: i64) -> NewCheckout {
        NewCheckout {
            nic: nic.to_string(),
            full_name: "Dana Silva".to_string(),
            email: "dana@example.com".to_string(),
            phone: "0771234567".to_string(),
            category,
            count,
            password: None,
            payment_id: payment_id.to_string(),
            amount_cents: 2500,
            currency: "USD".to_string(),
            card_number: Some("4242 4242 4242 4242".to_string()),
        }
    }

    #[tokio::test]
    async fn checkout_assigns_counter_and_renders_qr() {
        let (service, repos) = service().await;
        add_counter(&repos, "c1", 10).await;

        let outcome = service
            .checkout(request("p1", "nic-1", TicketCategory::Family, 3))
            .await
            .unwrap();

        assert!(!outcome.replayed);
        assert_eq!(outcome.ticket.count, 3);
        assert_eq!(outcome.ticket.counter_label, "Gate c1");
        assert!(outcome.ticket.qr_payload.starts_with("CF|"));
        assert!(outcome.qr.data_url.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(
            outcome.ticket.payment.card_masked.as_deref(),
            Some("**** **** **** 4242")
        );

        use crate::domain::RepositoryProvider;
        let counter = repos.counters().find_by_id("c1").await.unwrap().unwrap();
        assert_eq!(counter.load, 3);
    }

    #[tokio::test]
    async fn replay_does_not_double_increment() {
        let (service, repos) = service().await;
        add_counter(&repos, "c1", 10).await;

        let first = service
            .checkout(request("p1", "nic-1", TicketCategory::Family, 2))
            .await
            .unwrap();
        let second = service
            .checkout(request("p1", "nic-1", TicketCategory::Family, 2))
            .await
            .unwrap();

        assert!(second.replayed);
        assert_eq!(first.ticket.id, second.ticket.id);

        use crate::domain::RepositoryProvider;
        assert_eq!(repos.tickets().find_all().await.unwrap().len(), 1);
        let counter = repos.counters().find_by_id("c1").await.unwrap().unwrap();
        assert_eq!(counter.load, 2);
    }

    #[tokio::test]
    async fn individual_count_is_forced_to_one() {
        let (service, repos) = service().await;
        add_counter(&repos, "c1", 10).await;

        let outcome = service
            .checkout(request("p1", "nic-1", TicketCategory::Individual, 5))
            .await
            .unwrap();
        assert_eq!(outcome.ticket.count, 1);
    }

    #[tokio::test]
    async fn duplicate_individual_nic_conflicts() {
        let (service, repos) = service().await;
        add_counter(&repos, "c1", 10).await;

        service
            .checkout(request("p1", "nic-1", TicketCategory::Individual, 1))
            .await
            .unwrap();

        let err = service
            .checkout(request("p2", "nic-1", TicketCategory::Individual, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn no_counters_rejects_checkout() {
        let (service, _repos) = service().await;
        let err = service
            .checkout(request("p1", "nic-1", TicketCategory::Individual, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NoCountersAvailable));
    }
}
