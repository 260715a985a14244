//! Class section repository.

use std::sync::Arc;

use crate::entities::{ClassSection, class_section};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Class section repository for database operations.
#[derive(Clone)]
pub struct ClassSectionRepository {
    db: Arc<DatabaseConnection>,
}

impl ClassSectionRepository {
    /// Create a new class section repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a section by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<class_section::Model>> {
        ClassSection::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a section by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<class_section::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("class section {id}")))
    }

    /// Create a new section.
    pub async fn create(&self, model: class_section::ActiveModel) -> AppResult<class_section::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List sections (paginated).
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<class_section::Model>> {
        ClassSection::find()
            .order_by_desc(class_section::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List sections taught by a teacher.
    pub async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<class_section::Model>> {
        ClassSection::find()
            .filter(class_section::Column::TeacherId.eq(teacher_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all sections.
    pub async fn count(&self) -> AppResult<u64> {
        ClassSection::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
