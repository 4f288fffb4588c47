//! Checkout and check-in DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::ticket::Ticket;

/// Payment details captured at checkout
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentRequest {
    /// Idempotency key; resubmitting the same value replays the checkout
    #[validate(length(min = 1, max = 100, message = "payment_id is required"))]
    pub payment_id: String,
    #[validate(range(min = 0, message = "amount must be non-negative"))]
    pub amount_cents: i64,
    /// ISO currency code, default USD
    pub currency: Option<String>,
    /// Full card number; only a masked form is stored
    pub card_number: Option<String>,
}

/// Attendee registration + ticket purchase
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 30, message = "nic is required"))]
    pub nic: String,
    #[validate(length(min = 1, max = 100, message = "full_name is required"))]
    pub full_name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "phone is required"))]
    pub phone: String,
    /// Ticket category: individual (default) or family
    #[serde(rename = "type")]
    pub category: Option<String>,
    /// Party size; ignored for individual tickets
    #[validate(range(min = 1, max = 50, message = "count must be 1-50"))]
    pub count: Option<i64>,
    /// Creates an attendee dashboard account when present
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(nested)]
    pub payment: PaymentRequest,
}

/// Scan request from a counter's QR scanner
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    /// Raw QR payload string
    #[validate(length(min = 1, message = "qr is required"))]
    pub qr: String,
    /// Counter name the scan happened at (defaults to the assigned one)
    pub counter: Option<String>,
    pub scanned_by: Option<String>,
}

/// Ticket API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketDto {
    pub id: String,
    pub nic: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub count: i64,
    pub payment_id: String,
    pub payment_status: String,
    pub amount_cents: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_id: Option<String>,
    pub counter_label: String,
    pub checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<String>,
    pub created_at: String,
}

impl TicketDto {
    pub fn from_domain(t: Ticket) -> Self {
        Self {
            id: t.id,
            nic: t.nic,
            full_name: t.full_name,
            email: t.email,
            phone: t.phone,
            category: t.category.as_str().to_string(),
            count: t.count,
            payment_id: t.payment.payment_id,
            payment_status: t.payment.status.as_str().to_string(),
            amount_cents: t.payment.amount_cents,
            currency: t.payment.currency,
            card_masked: t.payment.card_masked,
            counter_id: t.counter_id,
            counter_label: t.counter_label,
            checked_in: t.checked_in,
            checked_in_at: t.checked_in_at.map(|d| d.to_rfc3339()),
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Rendered QR image
#[derive(Debug, Serialize, ToSchema)]
pub struct QrDto {
    /// `data:image/svg+xml;base64,...`
    pub data_url: String,
}

/// Checkout response: the ticket and its QR image
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub ticket: TicketDto,
    pub qr: QrDto,
}

/// Scan response
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    pub ticket: TicketDto,
}

/// Ticket totals for staff dashboards
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketStats {
    pub checked_in: u64,
    pub total: u64,
}
