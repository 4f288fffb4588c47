//! Task repository interface

use async_trait::async_trait;

use super::model::Task;
use crate::domain::DomainResult;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn save(&self, task: Task) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Task>>;

    /// All tasks, newest first
    async fn find_all(&self) -> DomainResult<Vec<Task>>;

    /// Tasks assigned to a coordinator, newest first
    async fn find_for_coordinator(&self, coordinator_id: &str) -> DomainResult<Vec<Task>>;

    async fn update(&self, task: Task) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
