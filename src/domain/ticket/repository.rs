//! Ticket repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Ticket;
use crate::domain::DomainResult;

/// Append-only record of a QR scan at a counter.
#[derive(Debug, Clone)]
pub struct CheckInRecord {
    pub ticket_id: String,
    pub counter_label: String,
    pub scanned_by: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Save a new ticket
    async fn save(&self, ticket: Ticket) -> DomainResult<()>;

    /// Find ticket by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Ticket>>;

    /// Find ticket by its payment idempotency key
    async fn find_by_payment_id(&self, payment_id: &str) -> DomainResult<Option<Ticket>>;

    /// Find an individual-category ticket for a national ID
    async fn find_individual_by_nic(&self, nic: &str) -> DomainResult<Option<Ticket>>;

    /// All tickets, newest first
    async fn find_all(&self) -> DomainResult<Vec<Ticket>>;

    /// One page of tickets, newest first, with the total count
    async fn find_page(&self, page: u64, per_page: u64) -> DomainResult<(Vec<Ticket>, u64)>;

    /// Whether a scan-log entry already exists for the ticket. Second leg
    /// of the duplicate-scan guard next to the `checked_in` flag.
    async fn has_scan(&self, ticket_id: &str) -> DomainResult<bool>;

    /// Atomically record a check-in: insert the scan log entry, set the
    /// ticket's `checked_in` flag and timestamp, and release the assigned
    /// counter's load by the ticket's party size (floored at zero). All
    /// three writes commit together or not at all.
    async fn check_in(&self, record: CheckInRecord) -> DomainResult<Ticket>;

    /// Checked-in / total counts for dashboards
    async fn counts(&self) -> DomainResult<(u64, u64)>;
}
