//! Enrollment repository.

use std::sync::Arc;

use crate::entities::{Enrollment, enrollment};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Enrollment repository for database operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new enrollment.
    pub async fn create(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a student is already enrolled in a section.
    pub async fn exists(&self, student_id: &str, section_id: &str) -> AppResult<bool> {
        let count = Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::SectionId.eq(section_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// List enrollments for a student.
    pub async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List enrollments for a section.
    pub async fn find_by_section(&self, section_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::SectionId.eq(section_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::enrollment::EnrollmentSource;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_enrollment(id: &str, student_id: &str) -> enrollment::Model {
        enrollment::Model {
            id: id.to_string(),
            student_id: student_id.to_string(),
            section_id: "c1".to_string(),
            source: EnrollmentSource::Manual,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        assert!(repo.exists("s1", "c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_student() {
        let enrollment = create_test_enrollment("e1", "s1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[enrollment.clone()]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let result = repo.find_by_student("s1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source, EnrollmentSource::Manual);
    }
}
