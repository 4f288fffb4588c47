//! SeaORM implementation of IncidentRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::incident::{Incident, IncidentRepository, IncidentSeverity, IncidentStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::incident;

use super::db_err;

pub struct SeaOrmIncidentRepository {
    db: DatabaseConnection,
}

impl SeaOrmIncidentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: incident::Model) -> Incident {
    Incident {
        id: m.id,
        title: m.title,
        description: m.description,
        severity: IncidentSeverity::from_str(&m.severity),
        status: IncidentStatus::from_str(&m.status),
        location: m.location,
        reported_by: m.reported_by,
        image_url: m.image_url,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(i: Incident) -> incident::ActiveModel {
    incident::ActiveModel {
        id: Set(i.id),
        title: Set(i.title),
        description: Set(i.description),
        severity: Set(i.severity.as_str().to_string()),
        status: Set(i.status.as_str().to_string()),
        location: Set(i.location),
        reported_by: Set(i.reported_by),
        image_url: Set(i.image_url),
        created_at: Set(i.created_at),
        updated_at: Set(i.updated_at),
    }
}

// ── IncidentRepository impl ─────────────────────────────────────

#[async_trait]
impl IncidentRepository for SeaOrmIncidentRepository {
    async fn save(&self, i: Incident) -> DomainResult<()> {
        debug!("Saving incident: {}", i.id);
        domain_to_active(i).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Incident>> {
        let model = incident::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Incident>> {
        let models = incident::Entity::find()
            .order_by_desc(incident::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, i: Incident) -> DomainResult<()> {
        let existing = incident::Entity::find_by_id(&i.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Incident",
                field: "id",
                value: i.id,
            });
        }

        domain_to_active(i).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
