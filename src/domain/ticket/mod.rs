//! Ticket aggregate
//!
//! Contains the Ticket entity, the QR payload wire codec, and the
//! repository interface.

pub mod model;
pub mod qr;
pub mod repository;

pub use model::{Payment, PaymentStatus, Ticket, TicketCategory};
pub use qr::QrPayload;
pub use repository::{CheckInRecord, TicketRepository};
