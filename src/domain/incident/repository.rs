//! Incident repository interface

use async_trait::async_trait;

use super::model::Incident;
use crate::domain::DomainResult;

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn save(&self, incident: Incident) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Incident>>;

    /// All incidents, newest first
    async fn find_all(&self) -> DomainResult<Vec<Incident>>;

    async fn update(&self, incident: Incident) -> DomainResult<()>;
}
