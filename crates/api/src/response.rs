//! API response types.
//!
//! Wire shapes are fixed: entity views are camelCase, blocked deletions
//! surface through `AppError::BlockedByDependents`, archive listings
//! carry `totalPages`.

use chrono::{DateTime, FixedOffset, NaiveDate};
use institute_db::entities::attendance::AttendanceStatus;
use institute_db::entities::enrollment::EnrollmentSource;
use institute_db::entities::student::StudentDeleteReason;
use institute_db::entities::student_payment::PaymentMethod;
use institute_db::entities::teacher::TeacherDeleteReason;
use institute_db::entities::{
    attendance, class_section, enrollment, student, student_payment, teacher, teacher_payment,
};
use serde::Serialize;

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub const fn new(message: String) -> Self {
        Self { message }
    }
}

/// Student as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub id: String,
    pub name: String,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub level: String,
    pub enrolled_at: DateTime<FixedOffset>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<FixedOffset>>,
    pub deleted_by: Option<String>,
    pub delete_reason: Option<StudentDeleteReason>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<student::Model> for StudentView {
    fn from(m: student::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            guardian_name: m.guardian_name,
            guardian_phone: m.guardian_phone,
            level: m.level,
            enrolled_at: m.enrolled_at,
            is_deleted: m.is_deleted,
            deleted_at: m.deleted_at,
            deleted_by: m.deleted_by,
            delete_reason: m.delete_reason,
            created_at: m.created_at,
        }
    }
}

/// Teacher as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherView {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub subject: String,
    pub monthly_salary: i64,
    pub hired_at: DateTime<FixedOffset>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<FixedOffset>>,
    pub deleted_by: Option<String>,
    pub delete_reason: Option<TeacherDeleteReason>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<teacher::Model> for TeacherView {
    fn from(m: teacher::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            subject: m.subject,
            monthly_salary: m.monthly_salary,
            hired_at: m.hired_at,
            is_deleted: m.is_deleted,
            deleted_at: m.deleted_at,
            deleted_by: m.deleted_by,
            delete_reason: m.delete_reason,
            created_at: m.created_at,
        }
    }
}

/// Class section as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub level: String,
    pub teacher_id: Option<String>,
    pub schedule: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<class_section::Model> for SectionView {
    fn from(m: class_section::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            subject: m.subject,
            level: m.level,
            teacher_id: m.teacher_id,
            schedule: m.schedule,
            created_at: m.created_at,
        }
    }
}

/// Enrollment as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: String,
    pub student_id: String,
    pub section_id: String,
    pub source: EnrollmentSource,
    pub created_at: DateTime<FixedOffset>,
}

impl From<enrollment::Model> for EnrollmentView {
    fn from(m: enrollment::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            section_id: m.section_id,
            source: m.source,
            created_at: m.created_at,
        }
    }
}

/// Attendance entry as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    pub id: String,
    pub student_id: String,
    pub section_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub recorded_by: String,
}

impl From<attendance::Model> for AttendanceView {
    fn from(m: attendance::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            section_id: m.section_id,
            date: m.date,
            status: m.status,
            recorded_by: m.recorded_by,
        }
    }
}

/// Student fee payment as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPaymentView {
    pub id: String,
    pub student_id: String,
    pub amount: i64,
    pub month: String,
    pub method: PaymentMethod,
    pub recorded_by: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<student_payment::Model> for StudentPaymentView {
    fn from(m: student_payment::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            amount: m.amount,
            month: m.month,
            method: m.method,
            recorded_by: m.recorded_by,
            created_at: m.created_at,
        }
    }
}

/// Teacher salary payment as exposed over the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPaymentView {
    pub id: String,
    pub teacher_id: String,
    pub amount: i64,
    pub month: String,
    pub recorded_by: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<teacher_payment::Model> for TeacherPaymentView {
    fn from(m: teacher_payment::Model) -> Self {
        Self {
            id: m.id,
            teacher_id: m.teacher_id,
            amount: m.amount,
            month: m.month,
            recorded_by: m.recorded_by,
            created_at: m.created_at,
        }
    }
}

/// Paginated active or archived student listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListResponse {
    pub students: Vec<StudentView>,
    pub total_pages: u64,
}

/// Paginated active or archived teacher listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherListResponse {
    pub teachers: Vec<TeacherView>,
    pub total_pages: u64,
}
