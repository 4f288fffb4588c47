//! Reservation domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Spot flipped to occupied, reservation holds it
    Confirmed,
    /// Released; the spot went back to available
    Canceled,
    /// Time window ended normally
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "canceled" => Self::Canceled,
            "completed" => Self::Completed,
            _ => Self::Confirmed,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parking spot reservation
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: String,
    pub spot_id: String,
    /// Zone snapshot taken at reservation time
    pub zone_id: Option<String>,
    pub renter_name: String,
    pub renter_email: Option<String>,
    pub renter_phone: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub billable_hours: i64,
    pub amount_cents: i64,
    pub currency: String,
    /// Caller-supplied idempotency key
    pub payment_id: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    /// Whether this reservation's window intersects `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Reservation duration rounded up to whole hours, minimum 1.
///
/// Rounding happens in two steps, minutes first: `ceil(ceil(seconds/60)/60)`.
/// A non-positive window (end <= start) is invalid.
pub fn billable_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<i64> {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return Err(DomainError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }
    let minutes = (seconds + 59) / 60;
    let hours = (minutes + 59) / 60;
    Ok(hours.max(1))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(minutes: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now();
        (start, start + Duration::minutes(minutes))
    }

    #[test]
    fn sixty_minutes_bills_one_hour() {
        let (s, e) = at(60);
        assert_eq!(billable_hours(s, e).unwrap(), 1);
    }

    #[test]
    fn sixty_one_minutes_bills_two_hours() {
        let (s, e) = at(61);
        assert_eq!(billable_hours(s, e).unwrap(), 2);
    }

    #[test]
    fn sub_hour_window_bills_minimum_one() {
        let (s, e) = at(5);
        assert_eq!(billable_hours(s, e).unwrap(), 1);
    }

    #[test]
    fn partial_minute_rounds_up_before_hours() {
        let start = Utc::now();
        // 60 minutes and one second → 61 minutes → 2 hours
        let end = start + Duration::seconds(60 * 60 + 1);
        assert_eq!(billable_hours(start, end).unwrap(), 2);
    }

    #[test]
    fn empty_window_is_rejected() {
        let start = Utc::now();
        assert!(billable_hours(start, start).is_err());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (s, e) = at(30);
        assert!(billable_hours(e, s).is_err());
    }

    #[test]
    fn overlap_is_exclusive_at_boundaries() {
        let base = Utc::now();
        let r = Reservation {
            id: "r1".into(),
            spot_id: "s1".into(),
            zone_id: None,
            renter_name: "A".into(),
            renter_email: None,
            renter_phone: None,
            start_time: base,
            end_time: base + Duration::hours(2),
            billable_hours: 2,
            amount_cents: 1000,
            currency: "USD".into(),
            payment_id: "p1".into(),
            status: ReservationStatus::Confirmed,
            created_at: base,
            updated_at: base,
        };
        // back-to-back windows do not overlap
        assert!(!r.overlaps(base + Duration::hours(2), base + Duration::hours(3)));
        assert!(r.overlaps(base + Duration::hours(1), base + Duration::hours(3)));
        assert!(r.overlaps(base - Duration::hours(1), base + Duration::minutes(1)));
    }
}
