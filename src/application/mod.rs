//! Application layer - business logic and services

pub mod services;

pub use services::{
    CheckinService, CheckoutService, CounterAssignmentService, ParkingService, ReservationService,
    TaskService,
};
