//! SeaORM implementation of CounterRepository
//!
//! Load mutations are single conditional UPDATE statements so that two
//! concurrent assignments cannot push a bounded counter past capacity;
//! the selection itself is re-validated at write time.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::counter::{Counter, CounterRepository, CounterStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::counter;

use super::db_err;

pub struct SeaOrmCounterRepository {
    db: DatabaseConnection,
}

impl SeaOrmCounterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: counter::Model) -> Counter {
    Counter {
        id: m.id,
        name: m.name,
        entrance: m.entrance,
        status: CounterStatus::from_str(&m.status),
        capacity: m.capacity,
        load: m.load,
        staff: m.staff,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(c: Counter) -> counter::ActiveModel {
    counter::ActiveModel {
        id: Set(c.id),
        name: Set(c.name),
        entrance: Set(c.entrance),
        status: Set(c
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "entry".to_string())),
        capacity: Set(c.capacity),
        load: Set(c.load),
        staff: Set(c.staff),
        is_active: Set(c.is_active),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

// ── CounterRepository impl ──────────────────────────────────────

#[async_trait]
impl CounterRepository for SeaOrmCounterRepository {
    async fn save(&self, c: Counter) -> DomainResult<()> {
        debug!("Saving counter: {}", c.name);
        domain_to_active(c).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Counter>> {
        let model = counter::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Counter>> {
        let model = counter::Entity::find()
            .filter(counter::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Counter>> {
        let models = counter::Entity::find()
            .order_by_desc(counter::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active(&self) -> DomainResult<Vec<Counter>> {
        let models = counter::Entity::find()
            .filter(counter::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, c: Counter) -> DomainResult<()> {
        let existing = counter::Entity::find_by_id(&c.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Counter",
                field: "id",
                value: c.id,
            });
        }

        domain_to_active(c).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = counter::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Counter",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn try_increment_load(&self, id: &str, people: i64) -> DomainResult<bool> {
        // load += people only while load + people <= capacity; counters
        // with capacity <= 0 are unbounded
        let result = counter::Entity::update_many()
            .col_expr(
                counter::Column::Load,
                Expr::col(counter::Column::Load).add(people),
            )
            .col_expr(counter::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(counter::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(counter::Column::Capacity.lte(0))
                    .add(
                        Expr::col(counter::Column::Load)
                            .lte(Expr::col(counter::Column::Capacity).sub(people)),
                    ),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        debug!(
            "try_increment_load counter={} people={} matched={}",
            id, people, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    async fn increment_load(&self, id: &str, people: i64) -> DomainResult<()> {
        counter::Entity::update_many()
            .col_expr(
                counter::Column::Load,
                Expr::col(counter::Column::Load).add(people),
            )
            .col_expr(counter::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(counter::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn release_load(&self, id: &str, people: i64) -> DomainResult<()> {
        // decrement only while it stays non-negative
        let result = counter::Entity::update_many()
            .col_expr(
                counter::Column::Load,
                Expr::col(counter::Column::Load).sub(people),
            )
            .col_expr(counter::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(counter::Column::Id.eq(id))
            .filter(counter::Column::Load.gte(people))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            // floor at zero instead of going negative
            counter::Entity::update_many()
                .col_expr(counter::Column::Load, Expr::value(0))
                .col_expr(counter::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(counter::Column::Id.eq(id))
                .exec(&self.db)
                .await
                .map_err(db_err)?;
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::MigratorTrait;

    use crate::domain::counter::CounterStatus;
    use crate::infrastructure::database::migrator::Migrator;

    async fn repo() -> SeaOrmCounterRepository {
        // single connection so the in-memory database is shared
        let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = sea_orm::Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmCounterRepository::new(db)
    }

    fn counter(id: &str, capacity: i64, load: i64) -> Counter {
        Counter {
            id: id.to_string(),
            name: format!("Gate {id}"),
            entrance: "north".to_string(),
            status: Some(CounterStatus::Entry),
            capacity,
            load,
            staff: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn conditional_increment_respects_capacity() {
        let repo = repo().await;
        repo.save(counter("c1", 10, 8)).await.unwrap();

        assert!(repo.try_increment_load("c1", 2).await.unwrap());
        // now at 10/10; another +1 must refuse
        assert!(!repo.try_increment_load("c1", 1).await.unwrap());
        assert_eq!(repo.find_by_id("c1").await.unwrap().unwrap().load, 10);
    }

    #[tokio::test]
    async fn unbounded_counter_always_accepts() {
        let repo = repo().await;
        repo.save(counter("c1", 0, 1000)).await.unwrap();

        assert!(repo.try_increment_load("c1", 500).await.unwrap());
        assert_eq!(repo.find_by_id("c1").await.unwrap().unwrap().load, 1500);
    }

    #[tokio::test]
    async fn forced_increment_can_overflow() {
        let repo = repo().await;
        repo.save(counter("c1", 5, 5)).await.unwrap();

        repo.increment_load("c1", 3).await.unwrap();
        assert_eq!(repo.find_by_id("c1").await.unwrap().unwrap().load, 8);
    }

    #[tokio::test]
    async fn release_floors_at_zero() {
        let repo = repo().await;
        repo.save(counter("c1", 10, 3)).await.unwrap();

        repo.release_load("c1", 2).await.unwrap();
        assert_eq!(repo.find_by_id("c1").await.unwrap().unwrap().load, 1);

        repo.release_load("c1", 5).await.unwrap();
        assert_eq!(repo.find_by_id("c1").await.unwrap().unwrap().load, 0);
    }

    #[tokio::test]
    async fn find_active_filters_inactive() {
        let repo = repo().await;
        let mut inactive = counter("c2", 10, 0);
        inactive.is_active = false;
        repo.save(counter("c1", 10, 0)).await.unwrap();
        repo.save(inactive).await.unwrap();

        let active = repo.find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "c1");
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let repo = repo().await;
        repo.save(counter("c1", 10, 0)).await.unwrap();
        let mut dup = counter("c2", 10, 0);
        dup.name = "Gate c1".to_string();
        assert!(repo.save(dup).await.is_err());
    }
}
