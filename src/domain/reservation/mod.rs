//! Reservation aggregate
//!
//! Contains the Reservation entity, billable-hours computation, and the
//! repository interface for the atomic spot-occupancy transition.

pub mod model;
pub mod repository;

pub use model::{billable_hours, Reservation, ReservationStatus};
pub use repository::{CancelOutcome, ReservationRepository, ReserveError, ReserveOutcome};
