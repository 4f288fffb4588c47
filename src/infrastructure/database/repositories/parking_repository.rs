//! SeaORM implementation of ParkingRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::parking::{
    ParkingRepository, ParkingSpot, ParkingZone, SpotStatus, SpotType, ZoneOccupancy,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{spot, zone};

use super::db_err;

pub struct SeaOrmParkingRepository {
    db: DatabaseConnection,
}

impl SeaOrmParkingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn zone_to_domain(m: zone::Model) -> ParkingZone {
    ParkingZone {
        id: m.id,
        name: m.name,
        location: m.location,
        capacity: m.capacity,
        zone_type: SpotType::from_str(&m.zone_type),
        hourly_rate_cents: m.hourly_rate_cents,
        currency: m.currency,
        facilities: serde_json::from_str(&m.facilities).unwrap_or_default(),
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

fn spot_to_domain(m: spot::Model) -> ParkingSpot {
    ParkingSpot {
        id: m.id,
        zone_id: m.zone_id,
        label: m.label,
        spot_type: SpotType::from_str(&m.spot_type),
        status: SpotStatus::from_str(&m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn spot_to_active(s: ParkingSpot) -> spot::ActiveModel {
    spot::ActiveModel {
        id: Set(s.id),
        zone_id: Set(s.zone_id),
        label: Set(s.label),
        spot_type: Set(s.spot_type.as_str().to_string()),
        status: Set(s.status.as_str().to_string()),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

// ── ParkingRepository impl ──────────────────────────────────────

#[async_trait]
impl ParkingRepository for SeaOrmParkingRepository {
    async fn save_zone_with_spots(
        &self,
        z: ParkingZone,
        spots: Vec<ParkingSpot>,
    ) -> DomainResult<usize> {
        debug!("Saving zone {} with {} spots", z.name, spots.len());
        let txn = self.db.begin().await.map_err(db_err)?;

        let facilities = serde_json::to_string(&z.facilities)
            .map_err(|e| crate::domain::DomainError::Validation(e.to_string()))?;

        zone::ActiveModel {
            id: Set(z.id),
            name: Set(z.name),
            location: Set(z.location),
            capacity: Set(z.capacity),
            zone_type: Set(z.zone_type.as_str().to_string()),
            hourly_rate_cents: Set(z.hourly_rate_cents),
            currency: Set(z.currency),
            facilities: Set(facilities),
            is_active: Set(z.is_active),
            created_at: Set(z.created_at),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let created = spots.len();
        if !spots.is_empty() {
            spot::Entity::insert_many(spots.into_iter().map(spot_to_active))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(created)
    }

    async fn find_zone(&self, id: &str) -> DomainResult<Option<ParkingZone>> {
        let model = zone::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(zone_to_domain))
    }

    async fn find_zone_by_name(&self, name: &str) -> DomainResult<Option<ParkingZone>> {
        let model = zone::Entity::find()
            .filter(zone::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(zone_to_domain))
    }

    async fn find_zones(&self) -> DomainResult<Vec<ParkingZone>> {
        let models = zone::Entity::find()
            .order_by_desc(zone::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(zone_to_domain).collect())
    }

    async fn find_spot(&self, id: &str) -> DomainResult<Option<ParkingSpot>> {
        let model = spot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(spot_to_domain))
    }

    async fn find_spots_for_zone(&self, zone_id: &str) -> DomainResult<Vec<ParkingSpot>> {
        let models = spot::Entity::find()
            .filter(spot::Column::ZoneId.eq(zone_id))
            .order_by_asc(spot::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(spot_to_domain).collect())
    }

    async fn try_transition_spot(
        &self,
        spot_id: &str,
        from: SpotStatus,
        to: SpotStatus,
    ) -> DomainResult<bool> {
        let result = spot::Entity::update_many()
            .col_expr(spot::Column::Status, Expr::value(to.as_str()))
            .col_expr(spot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(spot::Column::Id.eq(spot_id))
            .filter(spot::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn occupancy_by_zone(&self) -> DomainResult<Vec<ZoneOccupancy>> {
        let zones = self.find_zones().await?;
        let spots = spot::Entity::find().all(&self.db).await.map_err(db_err)?;

        let mut result = Vec::with_capacity(zones.len());
        for z in zones {
            let mut occupancy = ZoneOccupancy {
                zone_id: z.id.clone(),
                zone_name: z.name.clone(),
                capacity: 0,
                occupied: 0,
                available: 0,
                maintenance: 0,
            };
            for s in spots.iter().filter(|s| s.zone_id == z.id) {
                occupancy.capacity += 1;
                match SpotStatus::from_str(&s.status) {
                    SpotStatus::Occupied => occupancy.occupied += 1,
                    SpotStatus::Available => occupancy.available += 1,
                    SpotStatus::Maintenance => occupancy.maintenance += 1,
                }
            }
            result.push(occupancy);
        }
        Ok(result)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;

    async fn repo() -> SeaOrmParkingRepository {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmParkingRepository::new(db)
    }

    fn zone(id: &str, name: &str, capacity: i64) -> ParkingZone {
        ParkingZone {
            id: id.to_string(),
            name: name.to_string(),
            location: "west lot".to_string(),
            capacity,
            zone_type: SpotType::Standard,
            hourly_rate_cents: 500,
            currency: "USD".to_string(),
            facilities: vec!["cctv".to_string(), "ev-charging".to_string()],
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn spots_for(z: &ParkingZone) -> Vec<ParkingSpot> {
        (1..=z.capacity)
            .map(|n| ParkingSpot {
                id: format!("{}-spot-{n}", z.id),
                zone_id: z.id.clone(),
                label: z.spot_label(n),
                spot_type: z.zone_type,
                status: SpotStatus::Available,
                created_at: z.created_at,
                updated_at: z.created_at,
            })
            .collect()
    }

    #[tokio::test]
    async fn zone_and_spots_are_created_together() {
        let repo = repo().await;
        let z = zone("z1", "North Field", 3);
        let created = repo
            .save_zone_with_spots(z.clone(), spots_for(&z))
            .await
            .unwrap();
        assert_eq!(created, 3);

        let spots = repo.find_spots_for_zone("z1").await.unwrap();
        assert_eq!(spots.len(), 3);
        assert_eq!(spots[0].label, "NORTH-1");

        let loaded = repo.find_zone("z1").await.unwrap().unwrap();
        assert_eq!(loaded.facilities, vec!["cctv", "ev-charging"]);
    }

    #[tokio::test]
    async fn transition_is_conditional() {
        let repo = repo().await;
        let z = zone("z1", "North", 1);
        repo.save_zone_with_spots(z.clone(), spots_for(&z))
            .await
            .unwrap();
        let spot_id = "z1-spot-1";

        assert!(repo
            .try_transition_spot(spot_id, SpotStatus::Available, SpotStatus::Maintenance)
            .await
            .unwrap());
        // already in maintenance, same transition refuses
        assert!(!repo
            .try_transition_spot(spot_id, SpotStatus::Available, SpotStatus::Maintenance)
            .await
            .unwrap());
        assert!(repo
            .try_transition_spot(spot_id, SpotStatus::Maintenance, SpotStatus::Available)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn occupancy_counts_by_status() {
        let repo = repo().await;
        let z = zone("z1", "North", 3);
        repo.save_zone_with_spots(z.clone(), spots_for(&z))
            .await
            .unwrap();

        repo.try_transition_spot("z1-spot-1", SpotStatus::Available, SpotStatus::Occupied)
            .await
            .unwrap();
        repo.try_transition_spot("z1-spot-2", SpotStatus::Available, SpotStatus::Maintenance)
            .await
            .unwrap();

        let occupancy = repo.occupancy_by_zone().await.unwrap();
        assert_eq!(occupancy.len(), 1);
        assert_eq!(occupancy[0].capacity, 3);
        assert_eq!(occupancy[0].occupied, 1);
        assert_eq!(occupancy[0].maintenance, 1);
        assert_eq!(occupancy[0].available, 1);
    }

    #[tokio::test]
    async fn spot_labels_are_unique_per_zone() {
        let repo = repo().await;
        let z = zone("z1", "North", 1);
        repo.save_zone_with_spots(z.clone(), spots_for(&z))
            .await
            .unwrap();

        let dup = ParkingSpot {
            id: "z1-dup".to_string(),
            zone_id: "z1".to_string(),
            label: "NORTH-1".to_string(),
            spot_type: SpotType::Standard,
            status: SpotStatus::Available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let z2 = zone("z2", "South", 0);
        // same label in a different zone is fine
        let other = ParkingSpot {
            id: "z2-s1".to_string(),
            zone_id: "z2".to_string(),
            label: "NORTH-1".to_string(),
            spot_type: SpotType::Standard,
            status: SpotStatus::Available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.save_zone_with_spots(z2, vec![other]).await.unwrap();
        assert!(repo.save_zone_with_spots(zone("z3", "East", 0), vec![dup]).await.is_err());
    }
}
