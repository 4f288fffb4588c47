//! Incident entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    pub description: String,

    /// Severity: low, medium, high, critical
    pub severity: String,

    /// Status: open, investigating, resolved
    pub status: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Reporter (user ID)
    pub reported_by: String,

    /// Public URL of the stored image, if one was uploaded
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
