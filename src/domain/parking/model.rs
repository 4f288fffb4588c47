//! Parking zone and spot domain entities

use chrono::{DateTime, Utc};

/// Spot status. `occupied` is flipped by the reservation transition only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotStatus {
    Available,
    Occupied,
    Maintenance,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "occupied" => Self::Occupied,
            "maintenance" => Self::Maintenance,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spot type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotType {
    Standard,
    Handicap,
    Vip,
}

impl SpotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Handicap => "handicap",
            Self::Vip => "vip",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "handicap" => Self::Handicap,
            "vip" => Self::Vip,
            _ => Self::Standard,
        }
    }
}

/// Parking zone; creating one batch-creates `capacity` spots.
#[derive(Debug, Clone)]
pub struct ParkingZone {
    pub id: String,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub zone_type: SpotType,
    pub hourly_rate_cents: i64,
    pub currency: String,
    pub facilities: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ParkingZone {
    /// Label for the n-th spot of this zone (1-based), unique within the
    /// zone: first word of the zone name upper-cased, e.g. "NORTH-12".
    pub fn spot_label(&self, n: i64) -> String {
        let prefix: String = self
            .name
            .split_whitespace()
            .next()
            .unwrap_or("ZONE")
            .to_uppercase();
        format!("{prefix}-{n}")
    }
}

/// A single parking spot
#[derive(Debug, Clone)]
pub struct ParkingSpot {
    pub id: String,
    pub zone_id: String,
    pub label: String,
    pub spot_type: SpotType,
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Occupancy aggregation for one zone
#[derive(Debug, Clone)]
pub struct ZoneOccupancy {
    pub zone_id: String,
    pub zone_name: String,
    pub capacity: i64,
    pub occupied: i64,
    pub available: i64,
    pub maintenance: i64,
}

impl ZoneOccupancy {
    pub fn occupancy_rate(&self) -> f64 {
        if self.capacity > 0 {
            self.occupied as f64 / self.capacity as f64
        } else {
            0.0
        }
    }
}

/// Occupancy aggregation across all zones
#[derive(Debug, Clone)]
pub struct OccupancyMetrics {
    pub capacity: i64,
    pub occupied: i64,
    pub available: i64,
    pub maintenance: i64,
    pub by_zone: Vec<ZoneOccupancy>,
}

impl OccupancyMetrics {
    pub fn from_zones(by_zone: Vec<ZoneOccupancy>) -> Self {
        let mut totals = Self {
            capacity: 0,
            occupied: 0,
            available: 0,
            maintenance: 0,
            by_zone: Vec::new(),
        };
        for z in &by_zone {
            totals.capacity += z.capacity;
            totals.occupied += z.occupied;
            totals.available += z.available;
            totals.maintenance += z.maintenance;
        }
        totals.by_zone = by_zone;
        totals
    }

    pub fn occupancy_rate(&self) -> f64 {
        if self.capacity > 0 {
            self.occupied as f64 / self.capacity as f64
        } else {
            0.0
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, capacity: i64) -> ParkingZone {
        ParkingZone {
            id: "z1".to_string(),
            name: name.to_string(),
            location: "west lot".to_string(),
            capacity,
            zone_type: SpotType::Standard,
            hourly_rate_cents: 500,
            currency: "USD".to_string(),
            facilities: vec!["cctv".to_string()],
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn spot_labels_use_zone_prefix() {
        let z = zone("North Field", 10);
        assert_eq!(z.spot_label(1), "NORTH-1");
        assert_eq!(z.spot_label(10), "NORTH-10");
    }

    #[test]
    fn metrics_totals_sum_zones() {
        let metrics = OccupancyMetrics::from_zones(vec![
            ZoneOccupancy {
                zone_id: "a".into(),
                zone_name: "A".into(),
                capacity: 10,
                occupied: 4,
                available: 5,
                maintenance: 1,
            },
            ZoneOccupancy {
                zone_id: "b".into(),
                zone_name: "B".into(),
                capacity: 20,
                occupied: 6,
                available: 14,
                maintenance: 0,
            },
        ]);
        assert_eq!(metrics.capacity, 30);
        assert_eq!(metrics.occupied, 10);
        assert_eq!(metrics.available, 19);
        assert!((metrics.occupancy_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_zone_has_zero_rate() {
        let z = ZoneOccupancy {
            zone_id: "e".into(),
            zone_name: "E".into(),
            capacity: 0,
            occupied: 0,
            available: 0,
            maintenance: 0,
        };
        assert_eq!(z.occupancy_rate(), 0.0);
    }

    #[test]
    fn status_parsing_defaults_to_available() {
        assert_eq!(SpotStatus::from_str("occupied"), SpotStatus::Occupied);
        assert_eq!(SpotStatus::from_str("whatever"), SpotStatus::Available);
    }
}
