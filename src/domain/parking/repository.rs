//! Parking repository interface

use async_trait::async_trait;

use super::model::{ParkingSpot, ParkingZone, SpotStatus, ZoneOccupancy};
use crate::domain::DomainResult;

#[async_trait]
pub trait ParkingRepository: Send + Sync {
    /// Save a zone together with its batch-created spots, atomically.
    /// Returns the number of spots created.
    async fn save_zone_with_spots(
        &self,
        zone: ParkingZone,
        spots: Vec<ParkingSpot>,
    ) -> DomainResult<usize>;

    /// Find zone by ID
    async fn find_zone(&self, id: &str) -> DomainResult<Option<ParkingZone>>;

    /// Find zone by unique name
    async fn find_zone_by_name(&self, name: &str) -> DomainResult<Option<ParkingZone>>;

    /// All zones, newest first
    async fn find_zones(&self) -> DomainResult<Vec<ParkingZone>>;

    /// Find spot by ID
    async fn find_spot(&self, id: &str) -> DomainResult<Option<ParkingSpot>>;

    /// All spots of a zone ordered by label
    async fn find_spots_for_zone(&self, zone_id: &str) -> DomainResult<Vec<ParkingSpot>>;

    /// Conditional status transition: set `to` only while the spot's
    /// current status is `from`. Returns false when the condition did not
    /// hold (caller decides between not-found and conflict).
    async fn try_transition_spot(
        &self,
        spot_id: &str,
        from: SpotStatus,
        to: SpotStatus,
    ) -> DomainResult<bool>;

    /// Per-zone occupancy aggregation
    async fn occupancy_by_zone(&self) -> DomainResult<Vec<ZoneOccupancy>>;
}
