//! Incident DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::incident::Incident;

/// Request to report an incident
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportIncidentRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// Severity: low, medium (default), high, critical
    pub severity: Option<String>,
    pub location: Option<String>,
    /// Base64-encoded image; stored under the upload directory
    pub image_base64: Option<String>,
    /// Image file extension, default "jpg"
    pub image_ext: Option<String>,
}

/// Request to move an incident to a new status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentStatusRequest {
    /// Status: open, investigating, resolved
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Incident API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub reported_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl IncidentDto {
    pub fn from_domain(i: Incident) -> Self {
        Self {
            id: i.id,
            title: i.title,
            description: i.description,
            severity: i.severity.as_str().to_string(),
            status: i.status.as_str().to_string(),
            location: i.location,
            reported_by: i.reported_by,
            image_url: i.image_url,
            created_at: i.created_at.to_rfc3339(),
            updated_at: i.updated_at.to_rfc3339(),
        }
    }
}
