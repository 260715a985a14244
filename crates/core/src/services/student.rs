//! Student management service.

use async_trait::async_trait;
use chrono::Utc;
use institute_common::{AppError, AppResult, IdGenerator, RelatedRecords};
use institute_db::entities::student;
use institute_db::repositories::{CascadeOutcome, StudentRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::deletion::DeletionTarget;

const MAX_PAGE_SIZE: u64 = 100;

/// Input for creating a student.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub guardian_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub guardian_phone: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub level: String,
    /// Defaults to now when omitted.
    pub enrolled_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Input for updating a student. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub guardian_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub guardian_phone: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub level: Option<String>,
}

/// Student CRUD and listing.
#[derive(Clone)]
pub struct StudentService {
    students: StudentRepository,
    id_gen: IdGenerator,
}

impl StudentService {
    /// Create a new student service.
    #[must_use]
    pub const fn new(students: StudentRepository) -> Self {
        Self {
            students,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new student.
    pub async fn create(&self, input: CreateStudentInput) -> AppResult<student::Model> {
        input.validate()?;

        let now = Utc::now().fixed_offset();
        let model = student::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            guardian_name: Set(input.guardian_name),
            guardian_phone: Set(input.guardian_phone),
            level: Set(input.level),
            enrolled_at: Set(input.enrolled_at.unwrap_or(now)),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
            delete_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };
        self.students.create(model).await
    }

    /// Fetch one student, archived included.
    pub async fn get(&self, id: &str) -> AppResult<student::Model> {
        self.students.get_by_id(id).await
    }

    /// Update an active student.
    pub async fn update(&self, id: &str, input: UpdateStudentInput) -> AppResult<student::Model> {
        input.validate()?;

        let existing = self.students.get_by_id(id).await?;
        if existing.is_deleted {
            return Err(AppError::BadRequest(format!(
                "student {id} is archived and cannot be updated"
            )));
        }

        let mut active = student::ActiveModel {
            id: Set(id.to_string()),
            ..Default::default()
        };
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(guardian_name) = input.guardian_name {
            active.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = input.guardian_phone {
            active.guardian_phone = Set(Some(guardian_phone));
        }
        if let Some(level) = input.level {
            active.level = Set(level);
        }
        active.updated_at = Set(Some(Utc::now().fixed_offset()));

        self.students.update(active).await
    }

    /// List active students with the page count for the same filter-less
    /// total. `page` is 1-based.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
        query: Option<&str>,
    ) -> AppResult<(Vec<student::Model>, u64)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        let rows = self
            .students
            .find_active(limit, (page - 1) * limit, query)
            .await?;
        let total = self.students.count_active().await?;
        Ok((rows, total.div_ceil(limit)))
    }

    /// List archived students, most recently archived first. `page` is
    /// 1-based.
    pub async fn list_archived(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<student::Model>, u64)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        let rows = self
            .students
            .find_archived(limit, (page - 1) * limit)
            .await?;
        let total = self.students.count_archived().await?;
        Ok((rows, total.div_ceil(limit)))
    }
}

/// Deletion descriptor for students.
#[derive(Clone)]
pub struct StudentDeletionTarget {
    students: StudentRepository,
}

impl StudentDeletionTarget {
    /// Create a new student deletion target.
    #[must_use]
    pub const fn new(students: StudentRepository) -> Self {
        Self { students }
    }
}

#[async_trait]
impl DeletionTarget for StudentDeletionTarget {
    type Reason = student::StudentDeleteReason;

    fn entity_type(&self) -> &'static str {
        "student"
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::StudentNotFound(id.to_string())
    }

    async fn deletion_state(&self, id: &str) -> AppResult<Option<bool>> {
        Ok(self.students.find_by_id(id).await?.map(|s| s.is_deleted))
    }

    async fn related_records(&self, id: &str) -> AppResult<RelatedRecords> {
        self.students.related_records(id).await
    }

    async fn mark_deleted(
        &self,
        id: &str,
        reason: Self::Reason,
        deleted_by: &str,
    ) -> AppResult<u64> {
        self.students.soft_delete(id, reason, deleted_by).await
    }

    async fn clear_deletion(&self, id: &str) -> AppResult<u64> {
        self.students.restore(id).await
    }

    async fn purge_archived(&self, id: &str) -> AppResult<u64> {
        self.students.purge_archived(id).await
    }

    async fn cascade_delete(&self, id: &str) -> AppResult<CascadeOutcome> {
        self.students.cascade_delete(id).await
    }
}
