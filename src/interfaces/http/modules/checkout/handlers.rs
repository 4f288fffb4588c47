//! Checkout and check-in HTTP handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::services::checkout::NewCheckout;
use crate::application::{CheckinService, CheckoutService};
use crate::domain::ticket::TicketCategory;
use crate::domain::user::UserRole;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for checkout handlers.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub checkout: Arc<CheckoutService>,
    pub checkin: Arc<CheckinService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Ticket replayed (same payment_id)", body = ApiResponse<CheckoutResponse>),
        (status = 201, description = "Ticket issued", body = ApiResponse<CheckoutResponse>),
        (status = 409, description = "Duplicate individual NIC"),
        (status = 503, description = "No active counters available")
    )
)]
pub async fn checkout(
    State(state): State<CheckoutAppState>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<CheckoutResponse>>),
    (StatusCode, Json<ApiResponse<CheckoutResponse>>),
> {
    let category = request
        .category
        .as_deref()
        .map(TicketCategory::from_str)
        .unwrap_or(TicketCategory::Individual);

    let outcome = state
        .checkout
        .checkout(NewCheckout {
            nic: request.nic,
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            category,
            count: request.count.unwrap_or(1),
            password: request.password,
            payment_id: request.payment.payment_id,
            amount_cents: request.payment.amount_cents,
            currency: request.payment.currency.unwrap_or_else(|| "USD".to_string()),
            card_number: request.payment.card_number,
        })
        .await
        .map_err(domain_error_response)?;

    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(ApiResponse::success(CheckoutResponse {
            ticket: TicketDto::from_domain(outcome.ticket),
            qr: QrDto {
                data_url: outcome.qr.data_url,
            },
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout/scan",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Ticket checked in", body = ApiResponse<ScanResponse>),
        (status = 409, description = "Already checked in"),
        (status = 404, description = "Unknown ticket"),
        (status = 403, description = "Role may not scan")
    )
)]
pub async fn scan(
    State(state): State<CheckoutAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ScanRequest>,
) -> Result<Json<ApiResponse<ScanResponse>>, (StatusCode, Json<ApiResponse<ScanResponse>>)> {
    auth.require(UserRole::can_scan)
        .map_err(domain_error_response)?;

    let scanned_by = request.scanned_by.or(Some(auth.username));
    let ticket = state
        .checkin
        .scan(&request.qr, request.counter, scanned_by)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ScanResponse {
        ticket: TicketDto::from_domain(ticket),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of tickets, newest first", body = ApiResponse<PaginatedResponse<TicketDto>>),
        (status = 403, description = "Role may not list tickets")
    )
)]
pub async fn list_tickets(
    State(state): State<CheckoutAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<TicketDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<TicketDto>>>),
> {
    auth.require(UserRole::can_scan)
        .map_err(domain_error_response)?;

    let limit = params.limit.clamp(1, 100);
    let (tickets, total) = state
        .repos
        .tickets()
        .find_page(params.page as u64, limit as u64)
        .await
        .map_err(domain_error_response)?;

    let items = tickets.into_iter().map(TicketDto::from_domain).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items,
        total,
        params.page,
        limit,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/tickets/stats",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Checked-in / total ticket counts", body = ApiResponse<TicketStats>)
    )
)]
pub async fn ticket_stats(
    State(state): State<CheckoutAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<TicketStats>>, (StatusCode, Json<ApiResponse<TicketStats>>)> {
    auth.require(UserRole::can_scan)
        .map_err(domain_error_response)?;

    let (checked_in, total) = state
        .repos
        .tickets()
        .counts()
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(TicketStats { checked_in, total })))
}
