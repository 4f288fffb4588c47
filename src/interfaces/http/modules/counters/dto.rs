//! Counter DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::counter::Counter;

/// Counter API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CounterDto {
    pub id: String,
    pub name: String,
    pub entrance: String,
    /// Direction: entry, exit, both
    pub status: String,
    /// 0 means unbounded
    pub capacity: i64,
    pub load: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl CounterDto {
    pub fn from_domain(c: Counter) -> Self {
        Self {
            id: c.id,
            name: c.name,
            entrance: c.entrance,
            status: c
                .status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            capacity: c.capacity,
            load: c.load,
            staff: c.staff,
            is_active: c.is_active,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Request to create a counter
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCounterRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "entrance must be 1-100 characters"))]
    pub entrance: String,
    /// Direction: entry, exit, both (default entry)
    pub status: Option<String>,
    #[validate(range(min = 0, message = "capacity must be non-negative"))]
    pub capacity: Option<i64>,
    pub staff: Option<String>,
}

/// Request to update a counter
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCounterRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    pub entrance: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 0, message = "capacity must be non-negative"))]
    pub capacity: Option<i64>,
    pub staff: Option<String>,
    pub is_active: Option<bool>,
}

/// Aggregate counter statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct CounterStats {
    pub total: u64,
    pub active: u64,
    pub total_load: i64,
    pub total_capacity: i64,
}
