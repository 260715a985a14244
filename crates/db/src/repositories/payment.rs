//! Payment repositories (student fees and teacher salaries).

use std::sync::Arc;

use crate::entities::{StudentPayment, TeacherPayment, student_payment, teacher_payment};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Student fee payment repository.
#[derive(Clone)]
pub struct StudentPaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentPaymentRepository {
    /// Create a new student payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a fee payment.
    pub async fn create(
        &self,
        model: student_payment::ActiveModel,
    ) -> AppResult<student_payment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a student's payments, newest first.
    pub async fn find_by_student(
        &self,
        student_id: &str,
        limit: u64,
    ) -> AppResult<Vec<student_payment::Model>> {
        StudentPayment::find()
            .filter(student_payment::Column::StudentId.eq(student_id))
            .order_by_desc(student_payment::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Teacher salary payment repository.
#[derive(Clone)]
pub struct TeacherPaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl TeacherPaymentRepository {
    /// Create a new teacher payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a salary payment.
    pub async fn create(
        &self,
        model: teacher_payment::ActiveModel,
    ) -> AppResult<teacher_payment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a teacher's salary payments, newest first.
    pub async fn find_by_teacher(
        &self,
        teacher_id: &str,
        limit: u64,
    ) -> AppResult<Vec<teacher_payment::Model>> {
        TeacherPayment::find()
            .filter(teacher_payment::Column::TeacherId.eq(teacher_id))
            .order_by_desc(teacher_payment::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::student_payment::PaymentMethod;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_by_student() {
        let payment = student_payment::Model {
            id: "p1".to_string(),
            student_id: "s1".to_string(),
            amount: 50_000,
            month: "2026-08".to_string(),
            method: PaymentMethod::Cash,
            recorded_by: "admin1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[payment.clone()]])
                .into_connection(),
        );

        let repo = StudentPaymentRepository::new(db);
        let result = repo.find_by_student("s1", 20).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount, 50_000);
    }
}
