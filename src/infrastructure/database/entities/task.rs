//! Task entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(nullable)]
    pub description: Option<String>,

    /// Assigned coordinator (user ID)
    pub coordinator_id: String,

    /// Priority: low, medium, high
    pub priority: String,

    /// Status: open, in_progress, done
    pub status: String,

    #[sea_orm(nullable)]
    pub due_date: Option<DateTime<Utc>>,

    pub created_by: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CoordinatorId",
        to = "super::user::Column::Id"
    )]
    Coordinator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coordinator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
