//! Counter HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

use crate::domain::counter::{Counter, CounterStatus};
use crate::domain::user::UserRole;
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for counter handlers.
#[derive(Clone)]
pub struct CounterAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    post,
    path = "/api/v1/counters",
    tag = "Counters",
    security(("bearer_auth" = [])),
    request_body = CreateCounterRequest,
    responses(
        (status = 201, description = "Counter created", body = ApiResponse<CounterDto>),
        (status = 409, description = "Name already taken"),
        (status = 403, description = "Not an admin or organizer")
    )
)]
pub async fn create_counter(
    State(state): State<CounterAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateCounterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CounterDto>>), (StatusCode, Json<ApiResponse<CounterDto>>)>
{
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    if state
        .repos
        .counters()
        .find_by_name(&request.name)
        .await
        .map_err(domain_error_response)?
        .is_some()
    {
        return Err(domain_error_response(DomainError::Conflict(format!(
            "Counter '{}' already exists",
            request.name
        ))));
    }

    let status = match request.status.as_deref() {
        None => Some(CounterStatus::Entry),
        Some(s) => match CounterStatus::from_str(s) {
            Some(parsed) => Some(parsed),
            None => {
                return Err(domain_error_response(DomainError::Validation(format!(
                    "Unknown counter status '{s}' (expected entry, exit or both)"
                ))))
            }
        },
    };

    let now = Utc::now();
    let counter = Counter {
        id: uuid::Uuid::new_v4().to_string(),
        name: request.name,
        entrance: request.entrance,
        status,
        capacity: request.capacity.unwrap_or(0),
        load: 0,
        staff: request.staff,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    state
        .repos
        .counters()
        .save(counter.clone())
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CounterDto::from_domain(counter))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/counters",
    tag = "Counters",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All counters", body = ApiResponse<Vec<CounterDto>>)
    )
)]
pub async fn list_counters(
    State(state): State<CounterAppState>,
) -> Result<Json<ApiResponse<Vec<CounterDto>>>, (StatusCode, Json<ApiResponse<Vec<CounterDto>>>)> {
    let counters = state
        .repos
        .counters()
        .find_all()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        counters.into_iter().map(CounterDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/counters/stats",
    tag = "Counters",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate counter statistics", body = ApiResponse<CounterStats>)
    )
)]
pub async fn get_counter_stats(
    State(state): State<CounterAppState>,
) -> Result<Json<ApiResponse<CounterStats>>, (StatusCode, Json<ApiResponse<CounterStats>>)> {
    let counters = state
        .repos
        .counters()
        .find_all()
        .await
        .map_err(domain_error_response)?;

    let stats = CounterStats {
        total: counters.len() as u64,
        active: counters.iter().filter(|c| c.is_active).count() as u64,
        total_load: counters.iter().map(|c| c.load).sum(),
        total_capacity: counters.iter().map(|c| c.capacity).sum(),
    };

    Ok(Json(ApiResponse::success(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/counters/{id}",
    tag = "Counters",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Counter ID")),
    responses(
        (status = 200, description = "Counter details", body = ApiResponse<CounterDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_counter(
    State(state): State<CounterAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CounterDto>>, (StatusCode, Json<ApiResponse<CounterDto>>)> {
    let counter = state
        .repos
        .counters()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    let Some(counter) = counter else {
        return Err(domain_error_response(DomainError::NotFound {
            entity: "Counter",
            field: "id",
            value: id,
        }));
    };

    Ok(Json(ApiResponse::success(CounterDto::from_domain(counter))))
}

#[utoipa::path(
    put,
    path = "/api/v1/counters/{id}",
    tag = "Counters",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Counter ID")),
    request_body = UpdateCounterRequest,
    responses(
        (status = 200, description = "Counter updated", body = ApiResponse<CounterDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_counter(
    State(state): State<CounterAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCounterRequest>,
) -> Result<Json<ApiResponse<CounterDto>>, (StatusCode, Json<ApiResponse<CounterDto>>)> {
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    let counter = state
        .repos
        .counters()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    let Some(mut counter) = counter else {
        return Err(domain_error_response(DomainError::NotFound {
            entity: "Counter",
            field: "id",
            value: id,
        }));
    };

    if let Some(name) = request.name {
        counter.name = name;
    }
    if let Some(entrance) = request.entrance {
        counter.entrance = entrance;
    }
    if let Some(status) = request.status.as_deref() {
        counter.status = CounterStatus::from_str(status);
    }
    if let Some(capacity) = request.capacity {
        counter.capacity = capacity;
    }
    if let Some(staff) = request.staff {
        counter.staff = Some(staff);
    }
    if let Some(is_active) = request.is_active {
        counter.is_active = is_active;
    }
    counter.updated_at = Utc::now();

    state
        .repos
        .counters()
        .update(counter.clone())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(CounterDto::from_domain(counter))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/counters/{id}",
    tag = "Counters",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Counter ID")),
    responses(
        (status = 200, description = "Counter deleted", body = ApiResponse<String>),
        (status = 409, description = "Counter still has load"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_counter(
    State(state): State<CounterAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<String>>)> {
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    let counter = state
        .repos
        .counters()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    let Some(counter) = counter else {
        return Err(domain_error_response(DomainError::NotFound {
            entity: "Counter",
            field: "id",
            value: id,
        }));
    };

    if counter.is_active && counter.load > 0 {
        return Err(domain_error_response(DomainError::Conflict(format!(
            "Counter {} still has {} assigned attendees",
            counter.name, counter.load
        ))));
    }

    state
        .repos
        .counters()
        .delete(&id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success("Counter deleted".to_string())))
}
