//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240102_000001_create_properties_and_units;
mod m20240103_000001_create_leases_and_payments;
mod m20240104_000001_create_maintenance_tables;
mod m20240105_000001_create_notifications_and_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240102_000001_create_properties_and_units::Migration),
            Box::new(m20240103_000001_create_leases_and_payments::Migration),
            Box::new(m20240104_000001_create_maintenance_tables::Migration),
            Box::new(m20240105_000001_create_notifications_and_audit_logs::Migration),
        ]
    }
}
