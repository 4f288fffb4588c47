//! Parking zone and spot DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::parking::{OccupancyMetrics, ParkingSpot, ParkingZone, ZoneOccupancy};

/// Request to create a zone (spots are batch-created to capacity)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateZoneRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "location must be 1-100 characters"))]
    pub location: String,
    #[validate(range(min = 1, max = 10000, message = "capacity must be 1-10000"))]
    pub capacity: i64,
    /// Default spot type: standard, handicap, vip
    #[serde(rename = "type")]
    pub zone_type: Option<String>,
    /// Hourly rate in cents
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: Option<i64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

/// Zone API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneDto {
    pub id: String,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub zone_type: String,
    pub hourly_rate_cents: i64,
    pub currency: String,
    pub facilities: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl ZoneDto {
    pub fn from_domain(z: ParkingZone) -> Self {
        Self {
            id: z.id,
            name: z.name,
            location: z.location,
            capacity: z.capacity,
            zone_type: z.zone_type.as_str().to_string(),
            hourly_rate_cents: z.hourly_rate_cents,
            currency: z.currency,
            facilities: z.facilities,
            is_active: z.is_active,
            created_at: z.created_at.to_rfc3339(),
        }
    }
}

/// Zone creation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateZoneResponse {
    pub data: ZoneDto,
    pub spots_created: usize,
}

/// Spot API representation
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotDto {
    pub id: String,
    pub zone_id: String,
    pub label: String,
    pub spot_type: String,
    pub status: String,
}

impl SpotDto {
    pub fn from_domain(s: ParkingSpot) -> Self {
        Self {
            id: s.id,
            zone_id: s.zone_id,
            label: s.label,
            spot_type: s.spot_type.as_str().to_string(),
            status: s.status.as_str().to_string(),
        }
    }
}

/// Maintenance toggle request
#[derive(Debug, Deserialize, ToSchema)]
pub struct MaintenanceRequest {
    /// true puts the spot into maintenance, false returns it to service
    pub maintenance: bool,
}

/// Per-zone occupancy figures
#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneOccupancyDto {
    pub zone_id: String,
    pub zone_name: String,
    pub capacity: i64,
    pub occupied: i64,
    pub available: i64,
    pub maintenance: i64,
    pub occupancy_rate: f64,
}

impl ZoneOccupancyDto {
    fn from_domain(z: ZoneOccupancy) -> Self {
        let occupancy_rate = z.occupancy_rate();
        Self {
            zone_id: z.zone_id,
            zone_name: z.zone_name,
            capacity: z.capacity,
            occupied: z.occupied,
            available: z.available,
            maintenance: z.maintenance,
            occupancy_rate,
        }
    }
}

/// Occupancy totals across all zones
#[derive(Debug, Serialize, ToSchema)]
pub struct OccupancyTotalsDto {
    pub capacity: i64,
    pub occupied: i64,
    pub available: i64,
    pub maintenance: i64,
    pub occupancy_rate: f64,
}

/// Occupancy metrics response
#[derive(Debug, Serialize, ToSchema)]
pub struct OccupancyMetricsDto {
    pub totals: OccupancyTotalsDto,
    pub by_zone: Vec<ZoneOccupancyDto>,
}

impl OccupancyMetricsDto {
    pub fn from_domain(m: OccupancyMetrics) -> Self {
        let totals = OccupancyTotalsDto {
            capacity: m.capacity,
            occupied: m.occupied,
            available: m.available,
            maintenance: m.maintenance,
            occupancy_rate: m.occupancy_rate(),
        };
        Self {
            totals,
            by_zone: m
                .by_zone
                .into_iter()
                .map(ZoneOccupancyDto::from_domain)
                .collect(),
        }
    }
}
