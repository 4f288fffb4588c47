//! Counter repository interface

use async_trait::async_trait;

use super::model::Counter;
use crate::domain::DomainResult;

#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Save a new counter
    async fn save(&self, counter: Counter) -> DomainResult<()>;

    /// Find counter by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Counter>>;

    /// Find counter by unique name
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Counter>>;

    /// All counters, newest first
    async fn find_all(&self) -> DomainResult<Vec<Counter>>;

    /// All counters with `is_active = true`
    async fn find_active(&self) -> DomainResult<Vec<Counter>>;

    /// Update mutable counter fields (name, entrance, status, capacity,
    /// staff, active flag)
    async fn update(&self, counter: Counter) -> DomainResult<()>;

    /// Delete a counter by ID
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Conditional load increment: `load += people` only while the result
    /// stays within capacity (unbounded counters always accept). Returns
    /// false when the condition no longer holds, so the caller can move
    /// on to the next candidate.
    async fn try_increment_load(&self, id: &str, people: i64) -> DomainResult<bool>;

    /// Unconditional atomic load increment (overflow fallback).
    async fn increment_load(&self, id: &str, people: i64) -> DomainResult<()>;

    /// Atomic load decrement floored at zero.
    async fn release_load(&self, id: &str, people: i64) -> DomainResult<()>;
}
