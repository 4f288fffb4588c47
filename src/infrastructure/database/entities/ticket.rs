//! Ticket entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub nic: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,

    /// Category: individual, family
    pub category: String,

    /// Party size; 1 for individual
    pub count: i64,

    /// Caller-supplied idempotency key
    #[sea_orm(unique)]
    pub payment_id: String,
    pub payment_status: String,
    pub amount_cents: i64,
    pub currency: String,
    #[sea_orm(nullable)]
    pub card_masked: Option<String>,

    pub qr_payload: String,

    #[sea_orm(nullable)]
    pub counter_id: Option<String>,
    /// Denormalized counter name, "unassigned" when no counter exists
    pub counter_label: String,

    pub checked_in: bool,
    #[sea_orm(nullable)]
    pub checked_in_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::counter::Entity",
        from = "Column::CounterId",
        to = "super::counter::Column::Id"
    )]
    Counter,

    #[sea_orm(has_many = "super::scan_log::Entity")]
    ScanLogs,
}

impl Related<super::counter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counter.def()
    }
}

impl Related<super::scan_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
