//! Class sections, enrollment and attendance.

use chrono::Utc;
use institute_common::{AppError, AppResult, IdGenerator};
use institute_db::entities::attendance::AttendanceStatus;
use institute_db::entities::enrollment::EnrollmentSource;
use institute_db::entities::{attendance, class_section, enrollment};
use institute_db::repositories::{
    AttendanceRepository, ClassSectionRepository, EnrollmentRepository, StudentRepository,
    TeacherRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

const MAX_PAGE_SIZE: u64 = 100;

/// Input for creating a class section.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub subject: String,
    #[validate(length(min = 1, max = 32))]
    pub level: String,
    /// Assigned teacher; sections may start unassigned.
    pub teacher_id: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub schedule: Option<String>,
}

/// Input for enrolling a student in a section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollInput {
    pub student_id: String,
    pub section_id: String,
}

/// Input for recording one student's attendance on a date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceInput {
    pub student_id: String,
    pub section_id: String,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
}

/// Class section, enrollment and attendance operations.
#[derive(Clone)]
pub struct ClassService {
    sections: ClassSectionRepository,
    enrollments: EnrollmentRepository,
    attendance: AttendanceRepository,
    students: StudentRepository,
    teachers: TeacherRepository,
    id_gen: IdGenerator,
}

impl ClassService {
    /// Create a new class service.
    #[must_use]
    pub const fn new(
        sections: ClassSectionRepository,
        enrollments: EnrollmentRepository,
        attendance: AttendanceRepository,
        students: StudentRepository,
        teachers: TeacherRepository,
    ) -> Self {
        Self {
            sections,
            enrollments,
            attendance,
            students,
            teachers,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a class section, optionally assigned to an active teacher.
    pub async fn create_section(
        &self,
        input: CreateSectionInput,
    ) -> AppResult<class_section::Model> {
        input.validate()?;

        if let Some(ref teacher_id) = input.teacher_id {
            let teacher = self.teachers.get_by_id(teacher_id).await?;
            if teacher.is_deleted {
                return Err(AppError::BadRequest(format!(
                    "teacher {teacher_id} is archived and cannot be assigned"
                )));
            }
        }

        let model = class_section::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            subject: Set(input.subject),
            level: Set(input.level),
            teacher_id: Set(input.teacher_id),
            schedule: Set(input.schedule),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.sections.create(model).await
    }

    /// Fetch one section.
    pub async fn get_section(&self, id: &str) -> AppResult<class_section::Model> {
        self.sections.get_by_id(id).await
    }

    /// List sections with the page count. `page` is 1-based.
    pub async fn list_sections(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<class_section::Model>, u64)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);

        let rows = self.sections.find_all(limit, (page - 1) * limit).await?;
        let total = self.sections.count().await?;
        Ok((rows, total.div_ceil(limit)))
    }

    /// Enroll an active student in a section.
    pub async fn enroll(&self, input: EnrollInput) -> AppResult<enrollment::Model> {
        let student = self.students.get_by_id(&input.student_id).await?;
        if student.is_deleted {
            return Err(AppError::BadRequest(format!(
                "student {} is archived and cannot be enrolled",
                input.student_id
            )));
        }

        self.sections.get_by_id(&input.section_id).await?;

        if self
            .enrollments
            .exists(&input.student_id, &input.section_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "student {} is already enrolled in section {}",
                input.student_id, input.section_id
            )));
        }

        let model = enrollment::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(input.student_id),
            section_id: Set(input.section_id),
            source: Set(EnrollmentSource::Manual),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.enrollments.create(model).await
    }

    /// List a student's enrollments.
    pub async fn enrollments_for_student(
        &self,
        student_id: &str,
    ) -> AppResult<Vec<enrollment::Model>> {
        self.enrollments.find_by_student(student_id).await
    }

    /// Record one attendance entry. The student must be enrolled in the
    /// section; one entry per student, section and day.
    pub async fn record_attendance(
        &self,
        input: RecordAttendanceInput,
        recorded_by: &str,
    ) -> AppResult<attendance::Model> {
        let student = self.students.get_by_id(&input.student_id).await?;
        if student.is_deleted {
            return Err(AppError::BadRequest(format!(
                "student {} is archived",
                input.student_id
            )));
        }

        if !self
            .enrollments
            .exists(&input.student_id, &input.section_id)
            .await?
        {
            return Err(AppError::BadRequest(format!(
                "student {} is not enrolled in section {}",
                input.student_id, input.section_id
            )));
        }

        let model = attendance::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(input.student_id),
            section_id: Set(input.section_id),
            date: Set(input.date),
            status: Set(input.status),
            recorded_by: Set(recorded_by.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.attendance.create(model).await
    }

    /// List attendance for a section on one date.
    pub async fn attendance_sheet(
        &self,
        section_id: &str,
        date: chrono::NaiveDate,
    ) -> AppResult<Vec<attendance::Model>> {
        self.attendance
            .find_by_section_and_date(section_id, date)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_over(db: Arc<sea_orm::DatabaseConnection>) -> ClassService {
        ClassService::new(
            ClassSectionRepository::new(db.clone()),
            EnrollmentRepository::new(db.clone()),
            AttendanceRepository::new(db.clone()),
            StudentRepository::new(db.clone()),
            TeacherRepository::new(db),
        )
    }

    fn active_student(id: &str) -> institute_db::entities::student::Model {
        institute_db::entities::student::Model {
            id: id.to_string(),
            name: "Amina".to_string(),
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

    fn test_section(id: &str) -> class_section::Model {
        class_section::Model {
            id: id.to_string(),
            name: "Math A".to_string(),
            subject: "mathematics".to_string(),
            level: "secondary-3".to_string(),
            teacher_id: None,
            schedule: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_enroll_archived_student_rejected() {
        let mut archived = active_student("s1");
        archived.is_deleted = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[archived]])
                .into_connection(),
        );
        let service = service_over(db);

        let result = service
            .enroll(EnrollInput {
                student_id: "s1".to_string(),
                section_id: "c1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_enroll_duplicate_conflicts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active_student("s1")]])
                .append_query_results([[test_section("c1")]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );
        let service = service_over(db);

        let result = service
            .enroll(EnrollInput {
                student_id: "s1".to_string(),
                section_id: "c1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_record_attendance_requires_enrollment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active_student("s1")]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );
        let service = service_over(db);

        let result = service
            .record_attendance(
                RecordAttendanceInput {
                    student_id: "s1".to_string(),
                    section_id: "c1".to_string(),
                    date: chrono::NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
                    status: AttendanceStatus::Present,
                },
                "admin1",
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_section_with_archived_teacher_rejected() {
        let teacher = institute_db::entities::teacher::Model {
            id: "t1".to_string(),
            name: "Karim".to_string(),
            phone: None,
            subject: "mathematics".to_string(),
            monthly_salary: 120_000,
            hired_at: Utc::now().into(),
            is_deleted: true,
            deleted_at: Some(Utc::now().into()),
            deleted_by: Some("admin1".to_string()),
            delete_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[teacher]])
                .into_connection(),
        );
        let service = service_over(db);

        let result = service
            .create_section(CreateSectionInput {
                name: "Math A".to_string(),
                subject: "mathematics".to_string(),
                level: "secondary-3".to_string(),
                teacher_id: Some("t1".to_string()),
                schedule: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
