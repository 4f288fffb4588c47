//! User repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn find_all(&self) -> DomainResult<Vec<User>>;

    async fn count(&self) -> DomainResult<u64>;

    /// Update password hash
    async fn set_password_hash(&self, id: &str, hash: &str) -> DomainResult<()>;

    /// Record a successful login
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
}
