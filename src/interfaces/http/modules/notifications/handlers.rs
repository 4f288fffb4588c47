//! Notification HTTP handlers
//!
//! Persisted per-user notifications; the live WebSocket stream is wired
//! separately from the notifications module.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::notification::Notification;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{domain_error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for notification handlers.
#[derive(Clone)]
pub struct NotificationAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Notification API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationDto {
    pub id: String,
    pub kind: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

impl NotificationDto {
    fn from_domain(n: Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            message: n.message,
            read: n.read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Unread badge count
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountDto {
    pub unread: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own notifications, newest first", body = ApiResponse<Vec<NotificationDto>>)
    )
)]
pub async fn list_notifications(
    State(state): State<NotificationAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<
    Json<ApiResponse<Vec<NotificationDto>>>,
    (StatusCode, Json<ApiResponse<Vec<NotificationDto>>>),
> {
    let notifications = state
        .repos
        .notifications()
        .find_for_user(&auth.user_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        notifications
            .into_iter()
            .map(NotificationDto::from_domain)
            .collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unread count", body = ApiResponse<UnreadCountDto>)
    )
)]
pub async fn unread_count(
    State(state): State<NotificationAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UnreadCountDto>>, (StatusCode, Json<ApiResponse<UnreadCountDto>>)> {
    let unread = state
        .repos
        .notifications()
        .unread_count(&auth.user_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(UnreadCountDto { unread })))
}

#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}/read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = ApiResponse<String>),
        (status = 404, description = "Not found or not yours")
    )
)]
pub async fn mark_read(
    State(state): State<NotificationAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    state
        .repos
        .notifications()
        .mark_read(&id, &auth.user_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success("Marked read".to_string())))
}
