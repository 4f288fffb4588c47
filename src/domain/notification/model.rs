//! Notification domain entity

use chrono::{DateTime, Utc};

/// Persisted per-user notification, shown on dashboards
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    /// Recipient (user ID)
    pub user_id: String,
    /// Short machine-readable kind, e.g. "task_assigned"
    pub kind: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind: kind.into(),
            message: message.into(),
            read: false,
            created_at: now,
        }
    }
}
