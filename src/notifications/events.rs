//! Notification events
//!
//! Defines all event types that can be broadcasted to WebSocket clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Ticket issued at checkout
    TicketIssued(TicketIssuedEvent),
    /// Ticket scanned at a counter
    TicketCheckedIn(TicketCheckedInEvent),
    /// Parking spot reserved
    ReservationConfirmed(ReservationEvent),
    /// Reservation canceled, spot released
    ReservationCanceled(ReservationEvent),
    /// Task assigned to a coordinator
    TaskAssigned(TaskAssignedEvent),
    /// Incident reported on site
    IncidentReported(IncidentReportedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TicketIssued(_) => "ticket_issued",
            Event::TicketCheckedIn(_) => "ticket_checked_in",
            Event::ReservationConfirmed(_) => "reservation_confirmed",
            Event::ReservationCanceled(_) => "reservation_canceled",
            Event::TaskAssigned(_) => "task_assigned",
            Event::IncidentReported(_) => "incident_reported",
        }
    }

    /// ID of the entity the event is about, for client-side filtering
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            Event::TicketIssued(e) => e.counter_id.as_deref(),
            Event::TicketCheckedIn(e) => Some(&e.counter_label),
            Event::ReservationConfirmed(e) | Event::ReservationCanceled(e) => Some(&e.spot_id),
            Event::TaskAssigned(e) => Some(&e.coordinator_id),
            Event::IncidentReported(e) => Some(&e.incident_id),
        }
    }
}

/// Ticket issued event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketIssuedEvent {
    pub ticket_id: String,
    pub counter_id: Option<String>,
    pub count: i64,
    pub timestamp: DateTime<Utc>,
}

/// Ticket checked in event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCheckedInEvent {
    pub ticket_id: String,
    pub counter_label: String,
    pub count: i64,
    pub timestamp: DateTime<Utc>,
}

/// Reservation created or canceled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationEvent {
    pub reservation_id: String,
    pub spot_id: String,
    pub zone_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Task assigned event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssignedEvent {
    pub task_id: String,
    pub coordinator_id: String,
    pub title: String,
    pub priority: String,
    pub timestamp: DateTime<Utc>,
}

/// Incident reported event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReportedEvent {
    pub incident_id: String,
    pub severity: String,
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
