//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_counters;
mod m20250301_000003_create_tickets;
mod m20250301_000004_create_scan_logs;
mod m20250301_000005_create_zones;
mod m20250301_000006_create_spots;
mod m20250301_000007_create_reservations;
mod m20250301_000008_create_tasks;
mod m20250301_000009_create_notifications;
mod m20250301_000010_create_incidents;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_counters::Migration),
            Box::new(m20250301_000003_create_tickets::Migration),
            Box::new(m20250301_000004_create_scan_logs::Migration),
            Box::new(m20250301_000005_create_zones::Migration),
            Box::new(m20250301_000006_create_spots::Migration),
            Box::new(m20250301_000007_create_reservations::Migration),
            Box::new(m20250301_000008_create_tasks::Migration),
            Box::new(m20250301_000009_create_notifications::Migration),
            Box::new(m20250301_000010_create_incidents::Migration),
        ]
    }
}
