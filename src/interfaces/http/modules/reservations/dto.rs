//! Reservation DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::reservation::Reservation;

/// Request to reserve a spot for a time window
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "spot_id is required"))]
    pub spot_id: String,
    #[validate(length(min = 1, max = 100, message = "renter_name is required"))]
    pub renter_name: String,
    #[validate(email(message = "invalid email address"))]
    pub renter_email: Option<String>,
    pub renter_phone: Option<String>,
    /// RFC 3339 timestamp
    pub start_time: String,
    /// RFC 3339 timestamp, strictly after start_time
    pub end_time: String,
    /// Idempotency key; resubmitting replays the stored reservation
    #[validate(length(min = 1, max = 100, message = "payment_id is required"))]
    pub payment_id: String,
    /// Explicit total price; wins over the zone's hourly rate
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price_cents: Option<i64>,
}

/// Reservation API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub spot_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    pub renter_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renter_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renter_phone: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub billable_hours: i64,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_id: String,
    pub status: String,
    pub created_at: String,
}

impl ReservationDto {
    pub fn from_domain(r: Reservation) -> Self {
        Self {
            id: r.id,
            spot_id: r.spot_id,
            zone_id: r.zone_id,
            renter_name: r.renter_name,
            renter_email: r.renter_email,
            renter_phone: r.renter_phone,
            start_time: r.start_time.to_rfc3339(),
            end_time: r.end_time.to_rfc3339(),
            billable_hours: r.billable_hours,
            amount_cents: r.amount_cents,
            currency: r.currency,
            payment_id: r.payment_id,
            status: r.status.as_str().to_string(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Cancellation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelReservationResponse {
    pub reservation: ReservationDto,
}
