//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_course_table;
mod m20260101_000002_create_batch_table;
mod m20260101_000003_create_registration_table;
mod m20260101_000004_create_enrollment_table;
mod m20260101_000005_create_payment_table;
mod m20260101_000006_create_attendance_table;
mod m20260101_000007_create_audit_log_table;
mod m20260101_000008_create_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_course_table::Migration),
            Box::new(m20260101_000002_create_batch_table::Migration),
            Box::new(m20260101_000003_create_registration_table::Migration),
            Box::new(m20260101_000004_create_enrollment_table::Migration),
            Box::new(m20260101_000005_create_payment_table::Migration),
            Box::new(m20260101_000006_create_attendance_table::Migration),
            Box::new(m20260101_000007_create_audit_log_table::Migration),
            Box::new(m20260101_000008_create_notification_table::Migration),
        ]
    }
}
