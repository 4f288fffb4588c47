//! Task HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::DateTime;

use crate::application::services::task::NewTask;
use crate::application::TaskService;
use crate::domain::task::{TaskPriority, TaskStatus};
use crate::domain::user::UserRole;
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for task handlers.
#[derive(Clone)]
pub struct TaskAppState {
    pub tasks: Arc<TaskService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created, coordinator notified", body = ApiResponse<TaskDto>),
        (status = 404, description = "Coordinator not found"),
        (status = 403, description = "Not an admin or organizer")
    )
)]
pub async fn create_task(
    State(state): State<TaskAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TaskDto>>), (StatusCode, Json<ApiResponse<TaskDto>>)> {
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    let due_date = match request.due_date.as_deref() {
        None => None,
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::error(format!("Invalid due_date: {e}"))),
                    )
                })?,
        ),
    };

    let task = state
        .tasks
        .create(NewTask {
            title: request.title,
            description: request.description,
            coordinator_id: request.coordinator,
            priority: request
                .priority
                .as_deref()
                .map(TaskPriority::from_str)
                .unwrap_or(TaskPriority::Medium),
            due_date,
            created_by: auth.user_id,
        })
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TaskDto::from_domain(task))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All tasks", body = ApiResponse<Vec<TaskDto>>)
    )
)]
pub async fn list_tasks(
    State(state): State<TaskAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<TaskDto>>>, (StatusCode, Json<ApiResponse<Vec<TaskDto>>>)> {
    // Coordinators see their own queue; managers see everything
    let tasks = if auth.role == UserRole::Coordinator {
        state.tasks.list_for_coordinator(&auth.user_id).await
    } else {
        state.tasks.list().await
    }
    .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        tasks.into_iter().map(TaskDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = ApiResponse<TaskDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_task(
    State(state): State<TaskAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TaskDto>>, (StatusCode, Json<ApiResponse<TaskDto>>)> {
    let task = state.tasks.get(&id).await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(TaskDto::from_domain(task))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}/status",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Task ID")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<TaskDto>),
        (status = 409, description = "Illegal status transition"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_task_status(
    State(state): State<TaskAppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTaskStatusRequest>,
) -> Result<Json<ApiResponse<TaskDto>>, (StatusCode, Json<ApiResponse<TaskDto>>)> {
    let next = TaskStatus::from_str(&request.status);
    let task = state
        .tasks
        .update_status(&id, next)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(TaskDto::from_domain(task))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = ApiResponse<String>),
        (status = 404, description = "Not found"),
        (status = 403, description = "Not an admin or organizer")
    )
)]
pub async fn delete_task(
    State(state): State<TaskAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    state
        .tasks
        .delete(&id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success("Task deleted".to_string())))
}
