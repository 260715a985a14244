//! Teacher repository.

use std::sync::Arc;

use crate::entities::{
    ClassSection, Teacher, TeacherPayment, class_section, teacher, teacher_payment,
};
use crate::repositories::CascadeOutcome;
use crate::soft_delete;
use institute_common::{AppError, AppResult, RelatedRecords};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};

/// Teacher repository for database operations.
#[derive(Clone)]
pub struct TeacherRepository {
    db: Arc<DatabaseConnection>,
}

impl TeacherRepository {
    /// Create a new teacher repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a teacher by ID (active or archived).
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a teacher by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<teacher::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TeacherNotFound(id.to_string()))
    }

    /// Create a new teacher.
    pub async fn create(&self, model: teacher::ActiveModel) -> AppResult<teacher::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a teacher.
    pub async fn update(&self, model: teacher::ActiveModel) -> AppResult<teacher::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active teachers (paginated, optional name search).
    pub async fn find_active(
        &self,
        limit: u64,
        offset: u64,
        query: Option<&str>,
    ) -> AppResult<Vec<teacher::Model>> {
        let mut select = Teacher::find().filter(teacher::Column::IsDeleted.eq(false));

        if let Some(q) = query {
            let pattern = format!("%{}%", q.replace('%', "\\%").replace('_', "\\_"));
            select = select.filter(teacher::Column::Name.like(&pattern));
        }

        select
            .order_by_desc(teacher::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active teachers.
    pub async fn count_active(&self) -> AppResult<u64> {
        Teacher::find()
            .filter(teacher::Column::IsDeleted.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List archived teachers, most recently deleted first.
    pub async fn find_archived(&self, limit: u64, offset: u64) -> AppResult<Vec<teacher::Model>> {
        Teacher::find()
            .filter(teacher::Column::IsDeleted.eq(true))
            .order_by_desc(teacher::Column::DeletedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count archived teachers.
    pub async fn count_archived(&self) -> AppResult<u64> {
        Teacher::find()
            .filter(teacher::Column::IsDeleted.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count dependent rows per category for a teacher.
    ///
    /// Advisory point-in-time counts; every category present, zero
    /// included.
    pub async fn related_records(&self, id: &str) -> AppResult<RelatedRecords> {
        let class_sections = ClassSection::find()
            .filter(class_section::Column::TeacherId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let payments = TeacherPayment::find()
            .filter(teacher_payment::Column::TeacherId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut records = RelatedRecords::new();
        records.insert("classSections".to_string(), class_sections);
        records.insert("payments".to_string(), payments);
        Ok(records)
    }

    /// Stamp the deletion envelope on an active teacher.
    pub async fn soft_delete(
        &self,
        id: &str,
        reason: teacher::TeacherDeleteReason,
        deleted_by: &str,
    ) -> AppResult<u64> {
        soft_delete::mark_deleted::<Teacher, _>(self.db.as_ref(), id, reason, deleted_by).await
    }

    /// Clear the deletion envelope of an archived teacher.
    pub async fn restore(&self, id: &str) -> AppResult<u64> {
        soft_delete::clear_deletion::<Teacher, _>(self.db.as_ref(), id).await
    }

    /// Permanently remove an archived teacher row.
    pub async fn purge_archived(&self, id: &str) -> AppResult<u64> {
        soft_delete::purge::<Teacher, _>(self.db.as_ref(), id, true).await
    }

    /// Cascade-delete a teacher in one transaction.
    ///
    /// Class sections are unassigned rather than deleted (deleting them
    /// would orphan student enrollments); salary payments are removed,
    /// then the teacher row itself.
    pub async fn cascade_delete(&self, id: &str) -> AppResult<CascadeOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let class_sections = ClassSection::update_many()
            .col_expr(
                class_section::Column::TeacherId,
                Expr::value(Option::<String>::None),
            )
            .filter(class_section::Column::TeacherId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        let payments = TeacherPayment::delete_many()
            .filter(teacher_payment::Column::TeacherId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        let entity_rows = soft_delete::purge::<Teacher, _>(&txn, id, false).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut removed = RelatedRecords::new();
        removed.insert("classSections".to_string(), class_sections);
        removed.insert("payments".to_string(), payments);

        Ok(CascadeOutcome {
            removed,
            entity_removed: entity_rows > 0,
        })
    }

    /// Rewrite all class sections from one teacher to another and archive
    /// the original, in one transaction.
    ///
    /// Returns the number of sections moved. The bulk rewrite and the
    /// soft delete commit or roll back together.
    pub async fn reassign_and_archive(
        &self,
        old_id: &str,
        new_id: &str,
        deleted_by: &str,
    ) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let moved = ClassSection::update_many()
            .col_expr(class_section::Column::TeacherId, Expr::value(new_id))
            .filter(class_section::Column::TeacherId.eq(old_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected;

        let rows = soft_delete::mark_deleted::<Teacher, _>(
            &txn,
            old_id,
            teacher::TeacherDeleteReason::Reassigned,
            deleted_by,
        )
        .await?;

        if rows == 0 {
            // Lost a race to another delete; dropping the transaction
            // rolls the section rewrite back.
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::AlreadyDeleted(format!("teacher {old_id}")));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(moved)
    }
}
