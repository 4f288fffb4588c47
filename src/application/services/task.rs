//! Task service
//!
//! Task creation notifies the assigned coordinator: a persisted
//! notification row plus a broadcast event for connected dashboards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::domain::notification::Notification;
use crate::domain::task::{Task, TaskPriority, TaskStatus};
use crate::domain::user::UserRole;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, SharedEventBus, TaskAssignedEvent};

/// Task creation request, validated at the HTTP boundary.
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub coordinator_id: String,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: String,
}

pub struct TaskService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
}

impl TaskService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self { repos, event_bus }
    }

    pub async fn create(&self, req: NewTask) -> DomainResult<Task> {
        let Some(coordinator) = self.repos.users().find_by_id(&req.coordinator_id).await? else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: req.coordinator_id,
            });
        };
        if coordinator.role != UserRole::Coordinator && !coordinator.role.can_manage() {
            return Err(DomainError::Validation(format!(
                "User {} is not a coordinator",
                coordinator.username
            )));
        }

        let now = Utc::now();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            coordinator_id: coordinator.id.clone(),
            priority: req.priority,
            status: TaskStatus::Open,
            due_date: req.due_date,
            created_by: req.created_by,
            created_at: now,
            updated_at: now,
        };

        self.repos.tasks().save(task.clone()).await?;

        self.repos
            .notifications()
            .save(Notification::new(
                &coordinator.id,
                "task_assigned",
                format!("New task assigned: {}", task.title),
            ))
            .await?;

        info!("Task {} assigned to {}", task.id, coordinator.username);
        self.event_bus.publish(Event::TaskAssigned(TaskAssignedEvent {
            task_id: task.id.clone(),
            coordinator_id: coordinator.id,
            title: task.title.clone(),
            priority: task.priority.as_str().to_string(),
            timestamp: now,
        }));

        Ok(task)
    }

    pub async fn update_status(&self, id: &str, next: TaskStatus) -> DomainResult<Task> {
        let Some(mut task) = self.repos.tasks().find_by_id(id).await? else {
            return Err(DomainError::NotFound {
                entity: "Task",
                field: "id",
                value: id.to_string(),
            });
        };

        if task.status == next {
            return Ok(task);
        }
        if !task.status.can_transition_to(next) {
            return Err(DomainError::Conflict(format!(
                "Task {} cannot move {} -> {}",
                id, task.status, next
            )));
        }

        task.status = next;
        task.updated_at = Utc::now();
        self.repos.tasks().update(task.clone()).await?;
        Ok(task)
    }

    pub async fn list(&self) -> DomainResult<Vec<Task>> {
        self.repos.tasks().find_all().await
    }

    pub async fn list_for_coordinator(&self, coordinator_id: &str) -> DomainResult<Vec<Task>> {
        self.repos.tasks().find_for_coordinator(coordinator_id).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Task> {
        self.repos
            .tasks()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Task",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.tasks().delete(id).await
    }
}
