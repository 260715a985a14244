//! Attendance repository.

use std::sync::Arc;

use crate::entities::{Attendance, attendance};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Attendance repository for database operations.
#[derive(Clone)]
pub struct AttendanceRepository {
    db: Arc<DatabaseConnection>,
}

impl AttendanceRepository {
    /// Create a new attendance repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new attendance record.
    pub async fn create(&self, model: attendance::ActiveModel) -> AppResult<attendance::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a student's attendance records, newest first.
    pub async fn find_by_student(
        &self,
        student_id: &str,
        limit: u64,
    ) -> AppResult<Vec<attendance::Model>> {
        Attendance::find()
            .filter(attendance::Column::StudentId.eq(student_id))
            .order_by_desc(attendance::Column::Date)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List attendance for a section on a given date.
    pub async fn find_by_section_and_date(
        &self,
        section_id: &str,
        date: chrono::NaiveDate,
    ) -> AppResult<Vec<attendance::Model>> {
        Attendance::find()
            .filter(attendance::Column::SectionId.eq(section_id))
            .filter(attendance::Column::Date.eq(date))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
