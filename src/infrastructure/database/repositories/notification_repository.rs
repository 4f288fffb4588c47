//! SeaORM implementation of NotificationRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::notification::{Notification, NotificationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::notification;

use super::db_err;

pub struct SeaOrmNotificationRepository {
    db: DatabaseConnection,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: notification::Model) -> Notification {
    Notification {
        id: m.id,
        user_id: m.user_id,
        kind: m.kind,
        message: m.message,
        read: m.read,
        created_at: m.created_at,
    }
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn save(&self, n: Notification) -> DomainResult<()> {
        notification::ActiveModel {
            id: Set(n.id),
            user_id: Set(n.user_id),
            kind: Set(n.kind),
            message: Set(n.message),
            read: Set(n.read),
            created_at: Set(n.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Notification>> {
        let models = notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn mark_read(&self, id: &str, user_id: &str) -> DomainResult<()> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Notification",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn unread_count(&self, user_id: &str) -> DomainResult<u64> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Read.eq(false))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
