//! Parking aggregate
//!
//! Zones and their spots. A zone batch-creates one spot per unit of
//! capacity; spot status transitions are guarded by conditional updates.

pub mod model;
pub mod repository;

pub use model::{OccupancyMetrics, ParkingSpot, ParkingZone, SpotStatus, SpotType, ZoneOccupancy};
pub use repository::ParkingRepository;
