//! HTTP REST API
//!
//! - `middleware`: Authentication middleware (JWT + role guard)
//! - `modules`: Request handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use common::{ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson};
pub use router::create_api_router;
