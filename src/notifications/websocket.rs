//! WebSocket handler for dashboard notification clients
//!
//! Provides real-time event streaming to dashboard clients.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use super::event_bus::SharedEventBus;
use super::events::EventMessage;

/// Query parameters for filtering events
#[derive(Debug, Deserialize)]
pub struct EventFilter {
    /// Filter by subject ID: counter, spot, task or incident (optional)
    pub subject_id: Option<String>,
    /// Filter by event types (comma-separated, optional)
    pub event_types: Option<String>,
}

impl EventFilter {
    /// Check if event matches the filter
    pub fn matches(&self, event: &EventMessage) -> bool {
        if let Some(ref subject) = self.subject_id {
            if let Some(event_subject) = event.event.subject_id() {
                if event_subject != subject {
                    return false;
                }
            } else {
                return false;
            }
        }

        if let Some(ref types) = self.event_types {
            let allowed_types: Vec<&str> = types.split(',').map(|s| s.trim()).collect();
            if !allowed_types.contains(&event.event.event_type()) {
                return false;
            }
        }

        true
    }
}

/// State for notification WebSocket handler
#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
}

/// WebSocket upgrade handler for notifications
pub async fn ws_notifications_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    info!(
        "New notification WebSocket connection: subject={:?}, event_types={:?}",
        filter.subject_id, filter.event_types
    );

    ws.on_upgrade(move |socket| handle_notification_socket(socket, state, filter))
}

/// Handle a WebSocket connection for notifications
async fn handle_notification_socket(
    socket: WebSocket,
    state: NotificationState,
    filter: EventFilter,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = state.event_bus.subscribe();

    // Send welcome message
    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to notification stream",
        "filter": {
            "subject_id": filter.subject_id,
            "event_types": filter.event_types
        }
    });

    if let Err(e) = sender.send(Message::Text(welcome.to_string().into())).await {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    info!("Notification WebSocket client connected");

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received text message: {}", text);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        debug!("Received pong");
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client sent close");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                    _ => {}
                }
            }

            event = subscriber.recv() => {
                match event {
                    Some(event_msg) => {
                        if !filter.matches(&event_msg) {
                            continue;
                        }

                        match serde_json::to_string(&event_msg) {
                            Ok(json) => {
                                if let Err(e) = sender.send(Message::Text(json.into())).await {
                                    error!("Failed to send event: {}", e);
                                    break;
                                }
                                debug!("Event sent to client: {}", event_msg.event.event_type());
                            }
                            Err(e) => {
                                error!("Failed to serialize event: {}", e);
                            }
                        }
                    }
                    None => {
                        warn!("Event bus closed");
                        break;
                    }
                }
            }
        }
    }

    info!("Notification WebSocket client disconnected");
}

/// Create notification state
pub fn create_notification_state(event_bus: SharedEventBus) -> NotificationState {
    NotificationState { event_bus }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::{Event, TaskAssignedEvent};
    use chrono::Utc;

    fn task_event(coordinator: &str) -> EventMessage {
        EventMessage::new(Event::TaskAssigned(TaskAssignedEvent {
            task_id: "task-1".to_string(),
            coordinator_id: coordinator.to_string(),
            title: "Check gate 4".to_string(),
            priority: "high".to_string(),
            timestamp: Utc::now(),
        }))
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = EventFilter {
            subject_id: None,
            event_types: None,
        };
        assert!(filter.matches(&task_event("u-1")));
    }

    #[test]
    fn subject_filter_matches_coordinator() {
        let filter = EventFilter {
            subject_id: Some("u-1".to_string()),
            event_types: None,
        };
        assert!(filter.matches(&task_event("u-1")));
        assert!(!filter.matches(&task_event("u-2")));
    }

    #[test]
    fn type_filter_is_comma_separated() {
        let filter = EventFilter {
            subject_id: None,
            event_types: Some("ticket_issued, task_assigned".to_string()),
        };
        assert!(filter.matches(&task_event("u-1")));

        let only_tickets = EventFilter {
            subject_id: None,
            event_types: Some("ticket_issued".to_string()),
        };
        assert!(!only_tickets.matches(&task_event("u-1")));
    }
}
