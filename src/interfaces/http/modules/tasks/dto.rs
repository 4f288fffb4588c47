//! Task DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::task::Task;

/// Request to create a coordinator task
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    /// Assigned coordinator (user ID)
    #[validate(length(min = 1, message = "coordinator is required"))]
    pub coordinator: String,
    /// Priority: low, medium (default), high
    pub priority: Option<String>,
    /// RFC 3339 timestamp
    pub due_date: Option<String>,
}

/// Request to move a task to a new status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskStatusRequest {
    /// Status: open, in_progress, done
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Task API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coordinator_id: String,
    pub priority: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskDto {
    pub fn from_domain(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            coordinator_id: t.coordinator_id,
            priority: t.priority.as_str().to_string(),
            status: t.status.as_str().to_string(),
            due_date: t.due_date.map(|d| d.to_rfc3339()),
            created_by: t.created_by,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}
