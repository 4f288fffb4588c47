//! Reservation entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub spot_id: String,

    /// Zone snapshot taken at reservation time
    #[sea_orm(nullable)]
    pub zone_id: Option<String>,

    pub renter_name: String,
    #[sea_orm(nullable)]
    pub renter_email: Option<String>,
    #[sea_orm(nullable)]
    pub renter_phone: Option<String>,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Duration rounded up to whole hours, minimum 1
    pub billable_hours: i64,
    pub amount_cents: i64,
    pub currency: String,

    /// Caller-supplied idempotency key
    #[sea_orm(unique)]
    pub payment_id: String,

    /// Status: confirmed, canceled, completed
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::spot::Entity",
        from = "Column::SpotId",
        to = "super::spot::Column::Id"
    )]
    Spot,
}

impl Related<super::spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Spot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
