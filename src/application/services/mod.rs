//! Application services

pub mod checkin;
pub mod checkout;
pub mod counter_assignment;
pub mod parking;
pub mod reservation;
pub mod task;

pub use checkin::CheckinService;
pub use checkout::CheckoutService;
pub use counter_assignment::CounterAssignmentService;
pub use parking::ParkingService;
pub use reservation::ReservationService;
pub use task::TaskService;
