//! Parking zone and spot HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::parking::NewZone;
use crate::application::ParkingService;
use crate::domain::parking::SpotType;
use crate::domain::user::UserRole;
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for parking handlers.
#[derive(Clone)]
pub struct ParkingAppState {
    pub parking: Arc<ParkingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/zones",
    tag = "Parking",
    security(("bearer_auth" = [])),
    request_body = CreateZoneRequest,
    responses(
        (status = 201, description = "Zone created with its spots", body = ApiResponse<CreateZoneResponse>),
        (status = 409, description = "Zone name taken"),
        (status = 403, description = "Not an admin or organizer")
    )
)]
pub async fn create_zone(
    State(state): State<ParkingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateZoneRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<CreateZoneResponse>>),
    (StatusCode, Json<ApiResponse<CreateZoneResponse>>),
> {
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    let (zone, spots_created) = state
        .parking
        .create_zone(NewZone {
            name: request.name,
            location: request.location,
            capacity: request.capacity,
            zone_type: request
                .zone_type
                .as_deref()
                .map(SpotType::from_str)
                .unwrap_or(SpotType::Standard),
            hourly_rate_cents: request.price.unwrap_or(0),
            currency: request.currency.unwrap_or_else(|| "USD".to_string()),
            facilities: request.facilities,
        })
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateZoneResponse {
            data: ZoneDto::from_domain(zone),
            spots_created,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/zones",
    tag = "Parking",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All zones", body = ApiResponse<Vec<ZoneDto>>)
    )
)]
pub async fn list_zones(
    State(state): State<ParkingAppState>,
) -> Result<Json<ApiResponse<Vec<ZoneDto>>>, (StatusCode, Json<ApiResponse<Vec<ZoneDto>>>)> {
    let zones = state
        .parking
        .list_zones()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        zones.into_iter().map(ZoneDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/zones/{id}/spots",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Zone ID")),
    responses(
        (status = 200, description = "Spots of the zone", body = ApiResponse<Vec<SpotDto>>),
        (status = 404, description = "Zone not found")
    )
)]
pub async fn list_zone_spots(
    State(state): State<ParkingAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<SpotDto>>>, (StatusCode, Json<ApiResponse<Vec<SpotDto>>>)> {
    let spots = state
        .parking
        .zone_spots(&id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        spots.into_iter().map(SpotDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/v1/spots/{id}/maintenance",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Spot ID")),
    request_body = MaintenanceRequest,
    responses(
        (status = 200, description = "Spot status updated", body = ApiResponse<SpotDto>),
        (status = 409, description = "Spot is occupied"),
        (status = 404, description = "Spot not found")
    )
)]
pub async fn set_spot_maintenance(
    State(state): State<ParkingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<MaintenanceRequest>,
) -> Result<Json<ApiResponse<SpotDto>>, (StatusCode, Json<ApiResponse<SpotDto>>)> {
    auth.require(UserRole::can_manage)
        .map_err(domain_error_response)?;

    let spot = state
        .parking
        .set_maintenance(&id, request.maintenance)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(SpotDto::from_domain(spot))))
}

#[utoipa::path(
    get,
    path = "/api/v1/spots/metrics",
    tag = "Parking",
    responses(
        (status = 200, description = "Occupancy metrics", body = ApiResponse<OccupancyMetricsDto>)
    )
)]
pub async fn spot_metrics(
    State(state): State<ParkingAppState>,
) -> Result<Json<ApiResponse<OccupancyMetricsDto>>, (StatusCode, Json<ApiResponse<OccupancyMetricsDto>>)>
{
    let metrics = state
        .parking
        .occupancy_metrics()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(OccupancyMetricsDto::from_domain(
        metrics,
    ))))
}
