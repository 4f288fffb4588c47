pub mod counter;
pub mod incident;
pub mod notification;
pub mod parking;
pub mod repositories;
pub mod reservation;
pub mod task;
pub mod ticket;
pub mod user;

// Re-export commonly used types
pub use counter::{Counter, CounterStatus};
pub use incident::{Incident, IncidentSeverity, IncidentStatus};
pub use notification::Notification;
pub use parking::{ParkingSpot, ParkingZone, SpotStatus, SpotType};
pub use repositories::RepositoryProvider;
pub use reservation::{billable_hours, Reservation, ReservationStatus};
pub use task::{Task, TaskPriority, TaskStatus};
pub use ticket::{QrPayload, Ticket, TicketCategory};
pub use user::{User, UserRole};

// Re-export error types from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult};
