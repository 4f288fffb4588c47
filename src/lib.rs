//! # CrowdFlow
//!
//! Event/crowd management backend: attendee registration with QR tickets,
//! parking zone/spot reservation, entry counter load balancing, incident
//! reporting, task assignment and role-based dashboards.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and repository traits
//! - **application**: Business logic and services
//! - **infrastructure**: External concerns (database, crypto, QR rendering)
//! - **interfaces**: REST API with Swagger documentation
//! - **notifications**: Real-time WebSocket notifications for dashboards

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;

// Re-export API router
pub use interfaces::http::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
