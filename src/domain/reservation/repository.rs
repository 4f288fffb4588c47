//! Reservation repository interface
//!
//! The create path is a single atomic unit: compare-and-swap the spot to
//! `occupied` and insert the reservation, or nothing at all. The outcome
//! enums let the service map each case to its HTTP class without string
//! matching.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Reservation;
use crate::domain::parking::SpotStatus;
use crate::domain::DomainResult;

/// Result of the atomic reserve transition.
#[derive(Debug)]
pub enum ReserveOutcome {
    /// Spot flipped and reservation inserted
    Created(Reservation),
    /// A reservation with the same payment_id already existed; returned
    /// unchanged (idempotent replay)
    Replayed(Reservation),
}

/// Why the reserve transition did not happen. Wrapped into `DomainError`
/// by the service layer.
#[derive(Debug)]
pub enum ReserveError {
    /// No spot with that ID
    SpotNotFound,
    /// Spot exists but is not available; carries its actual status
    SpotUnavailable(SpotStatus),
    /// An active reservation overlaps the requested window
    Overlap { conflicting_id: String },
}

/// Result of a cancellation.
#[derive(Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Spot released, reservation canceled
    Canceled,
    /// Was already canceled; no-op success
    AlreadyCanceled,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomically flip the target spot `available → occupied` and insert
    /// the reservation. Replays by payment_id and the overlap look-ahead
    /// run inside the same transaction.
    async fn reserve(
        &self,
        reservation: Reservation,
    ) -> DomainResult<Result<ReserveOutcome, ReserveError>>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Find reservation by its payment idempotency key
    async fn find_by_payment_id(&self, payment_id: &str) -> DomainResult<Option<Reservation>>;

    /// All reservations, newest first
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// Non-canceled reservations on a spot intersecting `[start, end)`
    async fn find_overlapping(
        &self,
        spot_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Atomically set the reservation `canceled` and its spot back to
    /// `available`. Canceling an already-canceled reservation is a no-op
    /// success.
    async fn cancel(&self, id: &str) -> DomainResult<CancelOutcome>;
}
