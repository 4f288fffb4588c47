//! Common API response types

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard response envelope.
///
/// Every REST endpoint returns data in this wrapper.
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain error to its HTTP class with the standard envelope.
///
/// NotFound → 404, Conflict → 409, Validation → 400, Unauthorized → 401,
/// Forbidden → 403, NoCountersAvailable → 503 (retryable by the caller).
pub fn domain_error_response<T>(e: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(msg) if msg.starts_with("Database error:") => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NoCountersAvailable => StatusCode::SERVICE_UNAVAILABLE,
    };

    // Internal detail stays in the logs, not in the response body
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Internal error: {}", e);
        "Internal server error".to_string()
    } else {
        e.to_string()
    };

    (status, Json(ApiResponse::error(message)))
}

/// Pagination query parameters
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Paginated response with page metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total item count across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses_map_to_http_classes() {
        let (status, _) = domain_error_response::<()>(DomainError::Conflict("dup".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = domain_error_response::<()>(DomainError::NotFound {
            entity: "Ticket",
            field: "id",
            value: "x".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = domain_error_response::<()>(DomainError::NoCountersAvailable);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let (status, Json(body)) = domain_error_response::<()>(DomainError::Validation(
            "Database error: table missing".into(),
        ));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn pagination_computes_total_pages() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 101, 1, 50);
        assert_eq!(page.total_pages, 3);
    }
}
