//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_user_table;
mod m20260101_000002_create_student_table;
mod m20260101_000003_create_teacher_table;
mod m20260101_000004_create_class_section_table;
mod m20260101_000005_create_enrollment_table;
mod m20260101_000006_create_attendance_table;
mod m20260101_000007_create_student_payment_table;
mod m20260101_000008_create_teacher_payment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_user_table::Migration),
            Box::new(m20260101_000002_create_student_table::Migration),
            Box::new(m20260101_000003_create_teacher_table::Migration),
            Box::new(m20260101_000004_create_class_section_table::Migration),
            Box::new(m20260101_000005_create_enrollment_table::Migration),
            Box::new(m20260101_000006_create_attendance_table::Migration),
            Box::new(m20260101_000007_create_student_payment_table::Migration),
            Box::new(m20260101_000008_create_teacher_payment_table::Migration),
        ]
    }
}
