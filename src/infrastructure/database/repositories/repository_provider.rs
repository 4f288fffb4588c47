//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::counter::CounterRepository;
use crate::domain::incident::IncidentRepository;
use crate::domain::notification::NotificationRepository;
use crate::domain::parking::ParkingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::task::TaskRepository;
use crate::domain::ticket::TicketRepository;
use crate::domain::user::UserRepository;

use super::counter_repository::SeaOrmCounterRepository;
use super::incident_repository::SeaOrmIncidentRepository;
use super::notification_repository::SeaOrmNotificationRepository;
use super::parking_repository::SeaOrmParkingRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::task_repository::SeaOrmTaskRepository;
use super::ticket_repository::SeaOrmTicketRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let counter = repos.counters().find_by_id("c-1").await?;
/// let ticket = repos.tickets().find_by_payment_id("pay-1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    counters: SeaOrmCounterRepository,
    tickets: SeaOrmTicketRepository,
    parking: SeaOrmParkingRepository,
    reservations: SeaOrmReservationRepository,
    tasks: SeaOrmTaskRepository,
    incidents: SeaOrmIncidentRepository,
    notifications: SeaOrmNotificationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            counters: SeaOrmCounterRepository::new(db.clone()),
            tickets: SeaOrmTicketRepository::new(db.clone()),
            parking: SeaOrmParkingRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            tasks: SeaOrmTaskRepository::new(db.clone()),
            incidents: SeaOrmIncidentRepository::new(db.clone()),
            notifications: SeaOrmNotificationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn counters(&self) -> &dyn CounterRepository {
        &self.counters
    }

    fn tickets(&self) -> &dyn TicketRepository {
        &self.tickets
    }

    fn parking(&self) -> &dyn ParkingRepository {
        &self.parking
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn tasks(&self) -> &dyn TaskRepository {
        &self.tasks
    }

    fn incidents(&self) -> &dyn IncidentRepository {
        &self.incidents
    }

    fn notifications(&self) -> &dyn NotificationRepository {
        &self.notifications
    }
}
