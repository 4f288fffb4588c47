//! Repository access
//!
//! - `RepositoryProvider` — unified access to all per-aggregate repositories

use crate::domain::counter::CounterRepository;
use crate::domain::incident::IncidentRepository;
use crate::domain::notification::NotificationRepository;
use crate::domain::parking::ParkingRepository;
use crate::domain::reservation::ReservationRepository;
use crate::domain::task::TaskRepository;
use crate::domain::ticket::TicketRepository;
use crate::domain::user::UserRepository;

// ── RepositoryProvider ──────────────────────────────────────────

/// Unified access point for every aggregate repository.
///
/// Services and handlers depend on this trait; the SeaORM implementation
/// lives in the infrastructure layer.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let counters = repos.counters().find_active().await;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn counters(&self) -> &dyn CounterRepository;

    fn tickets(&self) -> &dyn TicketRepository;

    fn parking(&self) -> &dyn ParkingRepository;

    fn reservations(&self) -> &dyn ReservationRepository;

    fn tasks(&self) -> &dyn TaskRepository;

    fn incidents(&self) -> &dyn IncidentRepository;

    fn notifications(&self) -> &dyn NotificationRepository;
}
