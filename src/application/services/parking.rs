//! Parking service
//!
//! Zone creation with batch spot provisioning, maintenance toggling and
//! occupancy metrics.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::domain::parking::{
    OccupancyMetrics, ParkingSpot, ParkingZone, SpotStatus, SpotType,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Zone creation request, validated at the HTTP boundary.
pub struct NewZone {
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub zone_type: SpotType,
    pub hourly_rate_cents: i64,
    pub currency: String,
    pub facilities: Vec<String>,
}

pub struct ParkingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ParkingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a zone and batch-create one spot per unit of capacity.
    /// Returns the zone and the number of spots created.
    pub async fn create_zone(&self, req: NewZone) -> DomainResult<(ParkingZone, usize)> {
        if req.capacity < 1 {
            return Err(DomainError::Validation(
                "zone capacity must be at least 1".to_string(),
            ));
        }
        if self
            .repos
            .parking()
            .find_zone_by_name(&req.name)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Zone '{}' already exists",
                req.name
            )));
        }

        let now = Utc::now();
        let zone = ParkingZone {
            id: uuid::Uuid::new_v4().to_string(),
            name: req.name,
            location: req.location,
            capacity: req.capacity,
            zone_type: req.zone_type,
            hourly_rate_cents: req.hourly_rate_cents,
            currency: req.currency,
            facilities: req.facilities,
            is_active: true,
            created_at: now,
        };

        let spots: Vec<ParkingSpot> = (1..=req.capacity)
            .map(|n| ParkingSpot {
                id: uuid::Uuid::new_v4().to_string(),
                zone_id: zone.id.clone(),
                label: zone.spot_label(n),
                spot_type: zone.zone_type,
                status: SpotStatus::Available,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let created = self
            .repos
            .parking()
            .save_zone_with_spots(zone.clone(), spots)
            .await?;

        info!("Zone {} created with {} spots", zone.name, created);
        Ok((zone, created))
    }

    pub async fn list_zones(&self) -> DomainResult<Vec<ParkingZone>> {
        self.repos.parking().find_zones().await
    }

    pub async fn zone_spots(&self, zone_id: &str) -> DomainResult<Vec<ParkingSpot>> {
        if self.repos.parking().find_zone(zone_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "ParkingZone",
                field: "id",
                value: zone_id.to_string(),
            });
        }
        self.repos.parking().find_spots_for_zone(zone_id).await
    }

    /// Toggle a spot between available and maintenance. Occupied spots
    /// refuse: the reservation transition owns that status.
    pub async fn set_maintenance(&self, spot_id: &str, on: bool) -> DomainResult<ParkingSpot> {
        let (from, to) = if on {
            (SpotStatus::Available, SpotStatus::Maintenance)
        } else {
            (SpotStatus::Maintenance, SpotStatus::Available)
        };

        let flipped = self
            .repos
            .parking()
            .try_transition_spot(spot_id, from, to)
            .await?;

        if !flipped {
            return match self.repos.parking().find_spot(spot_id).await? {
                None => Err(DomainError::NotFound {
                    entity: "ParkingSpot",
                    field: "id",
                    value: spot_id.to_string(),
                }),
                Some(spot) => Err(DomainError::Conflict(format!(
                    "Spot {} cannot move {} -> {} (status: {})",
                    spot_id, from, to, spot.status
                ))),
            };
        }

        self.repos
            .parking()
            .find_spot(spot_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "ParkingSpot",
                field: "id",
                value: spot_id.to_string(),
            })
    }

    /// Per-zone occupancy aggregation with grand totals.
    pub async fn occupancy_metrics(&self) -> DomainResult<OccupancyMetrics> {
        let by_zone = self.repos.parking().occupancy_by_zone().await?;
        Ok(OccupancyMetrics::from_zones(by_zone))
    }
}
