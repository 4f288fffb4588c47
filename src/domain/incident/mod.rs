//! Incident report aggregate

pub mod model;
pub mod repository;

pub use model::{Incident, IncidentSeverity, IncidentStatus};
pub use repository::IncidentRepository;
