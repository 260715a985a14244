//! Student repository.

use std::sync::Arc;

use crate::entities::{
    Attendance, Enrollment, Student, StudentPayment, attendance, enrollment, student,
    student_payment,
};
use crate::repositories::CascadeOutcome;
use crate::soft_delete;
use institute_common::{AppError, AppResult, RelatedRecords};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Student repository for database operations.
#[derive(Clone)]
pub struct StudentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentRepository {
    /// Create a new student repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a student by ID (active or archived).
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<student::Model>> {
        Student::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a student by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<student::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::StudentNotFound(id.to_string()))
    }

    /// Create a new student.
    pub async fn create(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a student.
    pub async fn update(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active students (paginated, optional name search).
    pub async fn find_active(
        &self,
        limit: u64,
        offset: u64,
        query: Option<&str>,
    ) -> AppResult<Vec<student::Model>> {
        let mut select = Student::find().filter(student::Column::IsDeleted.eq(false));

        if let Some(q) = query {
            let pattern = format!("%{}%", q.replace('%', "\\%").replace('_', "\\_"));
            select = select.filter(student::Column::Name.like(&pattern));
        }

        select
            .order_by_desc(student::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active students.
    pub async fn count_active(&self) -> AppResult<u64> {
        Student::find()
            .filter(student::Column::IsDeleted.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List archived students, most recently deleted first.
    pub async fn find_archived(&self, limit: u64, offset: u64) -> AppResult<Vec<student::Model>> {
        Student::find()
            .filter(student::Column::IsDeleted.eq(true))
            .order_by_desc(student::Column::DeletedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count archived students.
    pub async fn count_archived(&self) -> AppResult<u64> {
        Student::find()
            .filter(student::Column::IsDeleted.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count dependent rows per category for a student.
    ///
    /// Advisory point-in-time counts; read-only, no transaction. Every
    /// category is present in the result, zero included.
    pub async fn related_records(&self, id: &str) -> AppResult<RelatedRecords> {
        let attendances = Attendance::find()
            .filter(attendance::Column::StudentId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let enrollments = Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let payments = StudentPayment::find()
            .filter(student_payment::Column::StudentId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut records = RelatedRecords::new();
        records.insert("attendances".to_string(), attendances);
        records.insert("enrollments".to_string(), enrollments);
        records.insert("payments".to_string(), payments);
        Ok(records)
    }

    /// Stamp the deletion envelope on an active student.
    ///
    /// Returns rows affected (0 = missing or already deleted).
    pub async fn soft_delete(
        &self,
        id: &str,
        reason: student::StudentDeleteReason,
        deleted_by: &str,
    ) -> AppResult<u64> {
        soft_delete::mark_deleted::<Student, _>(self.db.as_ref(), id, reason, deleted_by).await
    }

    /// Clear the deletion envelope of an archived student.
    ///
    /// Returns rows affected (0 = missing or not deleted).
    pub async fn restore(&self, id: &str) -> AppResult<u64> {
        soft_delete::clear_deletion::<Student, _>(self.db.as_ref(), id).await
    }

    /// Permanently remove an archived student row.
    ///
    /// Returns rows affected (0 = missing or still active).
    pub async fn purge_archived(&self, id: &str) -> AppResult<u64> {
        soft_delete::purge::<Student, _>(self.db.as_ref(), id, true).await
    }

    /// Delete all dependent rows and the student row itself, in one
    /// transaction. Child rows go first to satisfy foreign keys; a failure
    /// at any step rolls the whole sequence back.
    pub async fn cascade_delete(&self, id: &str) -> AppResult<CascadeOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let attendances = Attendance::delete_many()
            .filter(attendance::Column::StudentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        let enrollments = Enrollment::delete_many()
            .filter(enrollment::Column::StudentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        let payments = StudentPayment::delete_many()
            .filter(student_payment::Column::StudentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        // Cascade is the explicit override: the row need not be archived.
        let entity_rows = soft_delete::purge::<Student, _>(&txn, id, false).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut removed = RelatedRecords::new();
        removed.insert("attendances".to_string(), attendances);
        removed.insert("enrollments".to_string(), enrollments);
        removed.insert("payments".to_string(), payments);

        Ok(CascadeOutcome {
            removed,
            entity_removed: entity_rows > 0,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_student(id: &str, name: &str) -> student::Model {
        student::Model {
            id: id.to_string(),
            name: name.to_string(),
            guardian_name: None,
            guardian_phone: None,
            level: "secondary-3".to_string(),
            enrolled_at: Utc::now().into(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            delete_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let student = create_test_student("s1", "Amina");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student.clone()]])
                .into_connection(),
        );

        let repo = StudentRepository::new(db);
        let result = repo.find_by_id("s1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Amina");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<student::Model>::new()])
                .into_connection(),
        );

        let repo = StudentRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::StudentNotFound(id)) if id == "nonexistent"));
    }

    #[tokio::test]
    async fn test_related_records_all_categories_present() {
        // Three count queries: attendances, enrollments, payments.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(3)]])
                .append_query_results([[count_row(2)]])
                .append_query_results([[count_row(0)]])
                .into_connection(),
        );

        let repo = StudentRepository::new(db);
        let records = repo.related_records("s1").await.unwrap();

        assert_eq!(records.get("attendances"), Some(&3));
        assert_eq!(records.get("enrollments"), Some(&2));
        assert_eq!(records.get("payments"), Some(&0));
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_dependents_then_entity() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3, // attendances
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2, // enrollments
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0, // payments
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // student row
                    },
                ])
                .into_connection(),
        );

        let repo = StudentRepository::new(db);
        let outcome = repo.cascade_delete("s1").await.unwrap();

        assert_eq!(outcome.removed.get("attendances"), Some(&3));
        assert_eq!(outcome.removed.get("enrollments"), Some(&2));
        assert_eq!(outcome.removed.get("payments"), Some(&0));
        assert!(outcome.entity_removed);
    }

    #[tokio::test]
    async fn test_find_archived() {
        let mut archived = create_test_student("s2", "Bilal");
        archived.is_deleted = true;
        archived.deleted_at = Some(Utc::now().into());
        archived.deleted_by = Some("admin1".to_string());
        archived.delete_reason = Some(student::StudentDeleteReason::Graduated);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[archived.clone()]])
                .into_connection(),
        );

        let repo = StudentRepository::new(db);
        let result = repo.find_archived(10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].is_deleted);
        assert_eq!(
            result[0].delete_reason,
            Some(student::StudentDeleteReason::Graduated)
        );
    }
}
