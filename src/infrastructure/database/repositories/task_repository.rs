//! SeaORM implementation of TaskRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::task::{Task, TaskPriority, TaskRepository, TaskStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::task;

use super::db_err;

pub struct SeaOrmTaskRepository {
    db: DatabaseConnection,
}

impl SeaOrmTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: task::Model) -> Task {
    Task {
        id: m.id,
        title: m.title,
        description: m.description,
        coordinator_id: m.coordinator_id,
        priority: TaskPriority::from_str(&m.priority),
        status: TaskStatus::from_str(&m.status),
        due_date: m.due_date,
        created_by: m.created_by,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_active(t: Task) -> task::ActiveModel {
    task::ActiveModel {
        id: Set(t.id),
        title: Set(t.title),
        description: Set(t.description),
        coordinator_id: Set(t.coordinator_id),
        priority: Set(t.priority.as_str().to_string()),
        status: Set(t.status.as_str().to_string()),
        due_date: Set(t.due_date),
        created_by: Set(t.created_by),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}

// ── TaskRepository impl ─────────────────────────────────────────

#[async_trait]
impl TaskRepository for SeaOrmTaskRepository {
    async fn save(&self, t: Task) -> DomainResult<()> {
        debug!("Saving task: {}", t.id);
        domain_to_active(t).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Task>> {
        let model = task::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Task>> {
        let models = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_coordinator(&self, coordinator_id: &str) -> DomainResult<Vec<Task>> {
        let models = task::Entity::find()
            .filter(task::Column::CoordinatorId.eq(coordinator_id))
            .order_by_desc(task::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, t: Task) -> DomainResult<()> {
        let existing = task::Entity::find_by_id(&t.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Task",
                field: "id",
                value: t.id,
            });
        }

        domain_to_active(t).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = task::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Task",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
