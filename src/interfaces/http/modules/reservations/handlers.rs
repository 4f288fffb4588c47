//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;

use crate::application::services::reservation::NewReservation;
use crate::application::ReservationService;
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub reservations: Arc<ReservationService>,
}

fn parse_rfc3339<T>(
    field: &str,
    value: &str,
) -> Result<chrono::DateTime<chrono::Utc>, (StatusCode, Json<ApiResponse<T>>)> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Invalid {field}: {e}"))),
            )
        })
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created; replaying a payment_id returns the stored reservation unchanged", body = ApiResponse<ReservationDto>),
        (status = 409, description = "Spot not available, with its current status"),
        (status = 404, description = "Spot not found"),
        (status = 400, description = "Invalid time window")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<ReservationDto>>),
    (StatusCode, Json<ApiResponse<ReservationDto>>),
> {
    let start_time = parse_rfc3339("start_time", &request.start_time)?;
    let end_time = parse_rfc3339("end_time", &request.end_time)?;

    let payment_id = request.payment_id.clone();
    let reservation = state
        .reservations
        .create(NewReservation {
            spot_id: request.spot_id,
            renter_name: request.renter_name,
            renter_email: request.renter_email,
            renter_phone: request.renter_phone,
            start_time,
            end_time,
            payment_id,
            price_cents: request.price_cents,
        })
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from_domain(
            reservation,
        ))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reservations", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
) -> Result<
    Json<ApiResponse<Vec<ReservationDto>>>,
    (StatusCode, Json<ApiResponse<Vec<ReservationDto>>>),
> {
    let reservations = state
        .reservations
        .list()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        reservations
            .into_iter()
            .map(ReservationDto::from_domain)
            .collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, (StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let reservation = state
        .reservations
        .get(&id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ReservationDto::from_domain(
        reservation,
    ))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation canceled (idempotent)", body = ApiResponse<CancelReservationResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<
    Json<ApiResponse<CancelReservationResponse>>,
    (StatusCode, Json<ApiResponse<CancelReservationResponse>>),
> {
    let reservation = state
        .reservations
        .cancel(&id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(CancelReservationResponse {
        reservation: ReservationDto::from_domain(reservation),
    })))
}
