//! Notification repository interface

use async_trait::async_trait;

use super::model::Notification;
use crate::domain::DomainResult;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: Notification) -> DomainResult<()>;

    /// Notifications for one user, newest first
    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Notification>>;

    /// Mark one notification read; scoped to its owner
    async fn mark_read(&self, id: &str, user_id: &str) -> DomainResult<()>;

    /// Unread count for one user
    async fn unread_count(&self, user_id: &str) -> DomainResult<u64>;
}
