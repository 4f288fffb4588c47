//! SeaORM repository implementations

pub mod counter_repository;
pub mod incident_repository;
pub mod notification_repository;
pub mod parking_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod task_repository;
pub mod ticket_repository;
pub mod user_repository;

pub use counter_repository::SeaOrmCounterRepository;
pub use incident_repository::SeaOrmIncidentRepository;
pub use notification_repository::SeaOrmNotificationRepository;
pub use parking_repository::SeaOrmParkingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use reservation_repository::SeaOrmReservationRepository;
pub use task_repository::SeaOrmTaskRepository;
pub use ticket_repository::SeaOrmTicketRepository;
pub use user_repository::SeaOrmUserRepository;

use crate::domain::DomainError;

/// Map a SeaORM error into the domain error space.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}
