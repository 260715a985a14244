//! Teacher management service.
//!
//! Alongside the shared deletion workflow, teachers have one extra exit
//! path: reassignment, which moves every class section to another active
//! teacher and archives the original in the same transaction.

use async_trait::async_trait;
use chrono::Utc;
use institute_common::{AppError, AppResult, IdGenerator, RelatedRecords};
use institute_db::entities::teacher;
use institute_db::repositories::{CascadeOutcome, TeacherRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::audit::{self, AuditPhase};
use super::deletion::{AuthContext, DeletionTarget, validate_deletion_permission};

const MAX_PAGE_SIZE: u64 = 100;

/// Input for creating a teacher.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub subject: String,
    /// Monthly salary in the smallest currency unit.
    #[validate(range(min = 0))]
    pub monthly_salary: i64,
    /// Defaults to now when omitted.
    pub hired_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Input for updating a teacher. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub subject: Option<String>,
    #[validate(range(min = 0))]
    pub monthly_salary: Option<i64>,
}

/// Input for reassigning a teacher's class sections before archival.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignTeacherInput {
    /// The teacher taking over the class sections.
    pub reassign_to: String,
}

/// Teacher CRUD, listing and reassignment.
#[derive(Clone)]
pub struct TeacherService {
    teachers: TeacherRepository,
    id_gen: IdGenerator,
}

impl TeacherService {
    /// Create a new teacher service.
    #[must_use]
    pub const fn new(teachers: TeacherRepository) -> Self {
        Self {
            teachers,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new teacher.
    pub async fn create(&self, input: CreateTeacherInput) -> AppResult<teacher::Model> {
        input.validate()?;

        let now = Utc::now().fixed_offset();
        let model = teacher::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            phone: Set(input.phone),
            subject: Set(input.subject),
            monthly_salary: Set(input.monthly_salary),
            hired_at: Set(input.hired_at.unwrap_or(now)),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
            delete_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };
        self.teachers.create(model).await
    }

    /// Fetch one teacher, archived included.
    pub async fn get(&self, id: &str) -> AppResult<teacher::Model> {
        self.teachers.get_by_id(id).await
    }

    /// Update an active teacher.
    pub async fn update(&self, id: &str, input: UpdateTeacherInput) -> AppResult<teacher::Model> {
        input.validate()?;

        let existing = self.teachers.get_by_id(id).await?;
        if existing.is_deleted {
            return Err(AppError::BadRequest(format!(
                "teacher {id} is archived and cannot be updated"
            )));
        }

        let mut active = teacher::ActiveModel {
            id: Set(id.to_string()),
            ..Default::default()
        };
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(subject) = input.subject {
            active.subject = Set(subject);
        }
        if let Some(monthly_salary) = input.monthly_salary {
            active.monthly_salary = Set(monthly_salary);
        }
        active.updated_at = Set(Some(Utc::now().fixed_offset()));

        self.teachers.update(active).await
    }

    /// List active teachers with the page count. `page` is 1-based.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
        query: Option<&str>,
    ) -> AppResult<(Vec<teacher::Model>, u64)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        let rows = self
            .teachers
            .find_active(limit, (page - 1) * limit, query)
            .await?;
        let total = self.teachers.count_active().await?;
        Ok((rows, total.div_ceil(limit)))
    }

    /// List archived teachers, most recently archived first. `page` is
    /// 1-based.
    pub async fn list_archived(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<teacher::Model>, u64)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        let rows = self
            .teachers
            .find_archived(limit, (page - 1) * limit)
            .await?;
        let total = self.teachers.count_archived().await?;
        Ok((rows, total.div_ceil(limit)))
    }

    /// Move every class section of `id` to another active teacher and
    /// archive `id` with the REASSIGNED reason, atomically.
    ///
    /// The replacement must exist, be active, and differ from the teacher
    /// being retired.
    pub async fn reassign_and_archive(
        &self,
        ctx: &AuthContext,
        id: &str,
        input: ReassignTeacherInput,
    ) -> AppResult<String> {
        let action = "reassign";
        let fail = |err: AppError| {
            audit::record(
                "teacher",
                id,
                action,
                AuditPhase::Error,
                &ctx.user_id,
                Some(&err.to_string()),
            );
            err
        };
        validate_deletion_permission(ctx).map_err(fail)?;

        audit::record(
            "teacher",
            id,
            action,
            AuditPhase::Attempt,
            &ctx.user_id,
            Some(&format!("reassign_to={}", input.reassign_to)),
        );

        if input.reassign_to == id {
            return Err(fail(AppError::BadRequest(
                "cannot reassign a teacher's sections to themselves".to_string(),
            )));
        }

        let old = self.teachers.get_by_id(id).await.map_err(fail)?;
        if old.is_deleted {
            return Err(fail(AppError::AlreadyDeleted(format!("teacher {id}"))));
        }

        let replacement = self
            .teachers
            .get_by_id(&input.reassign_to)
            .await
            .map_err(fail)?;
        if replacement.is_deleted {
            return Err(fail(AppError::BadRequest(format!(
                "teacher {} is archived and cannot take over class sections",
                input.reassign_to
            ))));
        }

        let moved = self
            .teachers
            .reassign_and_archive(id, &input.reassign_to, &ctx.user_id)
            .await
            .map_err(fail)?;

        audit::record(
            "teacher",
            id,
            action,
            AuditPhase::Success,
            &ctx.user_id,
            Some(&format!("moved {moved} sections to {}", input.reassign_to)),
        );
        Ok(format!(
            "teacher {id} archived, {moved} class sections reassigned to {}",
            input.reassign_to
        ))
    }
}

/// Deletion descriptor for teachers.
#[derive(Clone)]
pub struct TeacherDeletionTarget {
    teachers: TeacherRepository,
}

impl TeacherDeletionTarget {
    /// Create a new teacher deletion target.
    #[must_use]
    pub const fn new(teachers: TeacherRepository) -> Self {
        Self { teachers }
    }
}

#[async_trait]
impl DeletionTarget for TeacherDeletionTarget {
    type Reason = teacher::TeacherDeleteReason;

    fn entity_type(&self) -> &'static str {
        "teacher"
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::TeacherNotFound(id.to_string())
    }

    async fn deletion_state(&self, id: &str) -> AppResult<Option<bool>> {
        Ok(self.teachers.find_by_id(id).await?.map(|t| t.is_deleted))
    }

    async fn related_records(&self, id: &str) -> AppResult<RelatedRecords> {
        self.teachers.related_records(id).await
    }

    async fn mark_deleted(
        &self,
        id: &str,
        reason: Self::Reason,
        deleted_by: &str,
    ) -> AppResult<u64> {
        self.teachers.soft_delete(id, reason, deleted_by).await
    }

    async fn clear_deletion(&self, id: &str) -> AppResult<u64> {
        self.teachers.restore(id).await
    }

    async fn purge_archived(&self, id: &str) -> AppResult<u64> {
        self.teachers.purge_archived(id).await
    }

    async fn cascade_delete(&self, id: &str) -> AppResult<CascadeOutcome> {
        self.teachers.cascade_delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_teacher(id: &str, is_deleted: bool) -> teacher::Model {
        teacher::Model {
            id: id.to_string(),
            name: "Karim".to_string(),
            phone: None,
            subject: "mathematics".to_string(),
            monthly_salary: 120_000,
            hired_at: Utc::now().into(),
            is_deleted,
            deleted_at: is_deleted.then(|| Utc::now().into()),
            deleted_by: is_deleted.then(|| "admin1".to_string()),
            delete_reason: is_deleted.then_some(teacher::TeacherDeleteReason::Resigned),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn admin() -> AuthContext {
        AuthContext {
            user_id: "admin1".to_string(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn test_reassign_to_self_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TeacherService::new(TeacherRepository::new(db));

        let result = service
            .reassign_and_archive(
                &admin(),
                "t1",
                ReassignTeacherInput {
                    reassign_to: "t1".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reassign_rejection_emits_error_audit_event() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TeacherService::new(TeacherRepository::new(db));

        let buffer = audit::capture::LogBuffer::default();
        let guard = tracing::subscriber::set_default(audit::capture::subscriber(&buffer));
        let result = service
            .reassign_and_archive(
                &admin(),
                "t1",
                ReassignTeacherInput {
                    reassign_to: "t1".to_string(),
                },
            )
            .await;
        drop(guard);

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        let logs = buffer.contents();
        assert!(logs.contains("phase=\"attempt\""));
        assert!(logs.contains("phase=\"error\""));
    }

    #[tokio::test]
    async fn test_reassign_to_archived_replacement_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_teacher("t1", false)]])
                .append_query_results([[test_teacher("t2", true)]])
                .into_connection(),
        );
        let service = TeacherService::new(TeacherRepository::new(db));

        let result = service
            .reassign_and_archive(
                &admin(),
                "t1",
                ReassignTeacherInput {
                    reassign_to: "t2".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reassign_missing_replacement_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_teacher("t1", false)]])
                .append_query_results([Vec::<teacher::Model>::new()])
                .into_connection(),
        );
        let service = TeacherService::new(TeacherRepository::new(db));

        let result = service
            .reassign_and_archive(
                &admin(),
                "t1",
                ReassignTeacherInput {
                    reassign_to: "ghost".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::TeacherNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_reassign_happy_path() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_teacher("t1", false)]])
                .append_query_results([[test_teacher("t2", false)]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3, // sections rewritten
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // envelope stamped
                    },
                ])
                .into_connection(),
        );
        let service = TeacherService::new(TeacherRepository::new(db));

        let message = service
            .reassign_and_archive(
                &admin(),
                "t1",
                ReassignTeacherInput {
                    reassign_to: "t2".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            message,
            "teacher t1 archived, 3 class sections reassigned to t2"
        );
    }

    #[tokio::test]
    async fn test_reassign_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TeacherService::new(TeacherRepository::new(db));

        let clerk = AuthContext {
            user_id: "clerk1".to_string(),
            is_admin: false,
        };
        let result = service
            .reassign_and_archive(
                &clerk,
                "t1",
                ReassignTeacherInput {
                    reassign_to: "t2".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
