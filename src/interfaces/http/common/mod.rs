//! Shared HTTP plumbing: response envelope, pagination, validation

pub mod response;
pub mod validated_json;

pub use response::{domain_error_response, ApiResponse, PaginatedResponse, PaginationParams};
pub use validated_json::ValidatedJson;
