//! Notifications module
//!
//! Provides real-time event notifications via WebSocket for dashboard
//! clients.
//!
//! # Features
//! - Event bus for pub/sub messaging
//! - WebSocket endpoint for dashboard clients
//! - Filtering by subject and event type
//!
//! # Usage
//! ```ignore
//! use crowdflow::notifications::{create_event_bus, Event, TicketIssuedEvent};
//! use chrono::Utc;
//!
//! let event_bus = create_event_bus();
//! event_bus.publish(Event::TicketIssued(TicketIssuedEvent {
//!     ticket_id: "t-1".to_string(),
//!     counter_id: Some("c-1".to_string()),
//!     count: 4,
//!     timestamp: Utc::now(),
//! }));
//! ```
//!
//! # WebSocket Endpoint
//! Connect to `/api/v1/notifications/ws` with optional query parameters:
//! - `subject_id` - Filter events by subject (counter, spot, task, ...)
//! - `event_types` - Comma-separated list of event types to receive

pub mod event_bus;
pub mod events;
pub mod websocket;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
pub use websocket::{create_notification_state, ws_notifications_handler, NotificationState};
