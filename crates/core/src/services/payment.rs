//! Fee and salary payment service.

use chrono::Utc;
use institute_common::{AppError, AppResult, IdGenerator};
use institute_db::entities::student_payment::PaymentMethod;
use institute_db::entities::{student_payment, teacher_payment};
use institute_db::repositories::{
    StudentPaymentRepository, StudentRepository, TeacherPaymentRepository, TeacherRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

const HISTORY_LIMIT: u64 = 50;

/// Input for recording a student fee payment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentPaymentInput {
    pub student_id: String,
    /// Amount in the smallest currency unit.
    #[validate(range(min = 1))]
    pub amount: i64,
    /// Fee month, `YYYY-MM`.
    pub month: String,
    pub method: PaymentMethod,
}

/// Input for recording a teacher salary payment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPaymentInput {
    pub teacher_id: String,
    /// Amount in the smallest currency unit.
    #[validate(range(min = 1))]
    pub amount: i64,
    /// Salary month, `YYYY-MM`.
    pub month: String,
}

/// Fee and salary payment operations.
#[derive(Clone)]
pub struct PaymentService {
    student_payments: StudentPaymentRepository,
    teacher_payments: TeacherPaymentRepository,
    students: StudentRepository,
    teachers: TeacherRepository,
    id_gen: IdGenerator,
}

impl PaymentService {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(
        student_payments: StudentPaymentRepository,
        teacher_payments: TeacherPaymentRepository,
        students: StudentRepository,
        teachers: TeacherRepository,
    ) -> Self {
        Self {
            student_payments,
            teacher_payments,
            students,
            teachers,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a fee payment for an active student.
    pub async fn record_student_payment(
        &self,
        input: StudentPaymentInput,
        recorded_by: &str,
    ) -> AppResult<student_payment::Model> {
        input.validate()?;
        validate_month(&input.month)?;

        let student = self.students.get_by_id(&input.student_id).await?;
        if student.is_deleted {
            return Err(AppError::BadRequest(format!(
                "student {} is archived",
                input.student_id
            )));
        }

        let model = student_payment::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(input.student_id),
            amount: Set(input.amount),
            month: Set(input.month),
            method: Set(input.method),
            recorded_by: Set(recorded_by.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.student_payments.create(model).await
    }

    /// Record a salary payment for an active teacher.
    pub async fn record_teacher_payment(
        &self,
        input: TeacherPaymentInput,
        recorded_by: &str,
    ) -> AppResult<teacher_payment::Model> {
        input.validate()?;
        validate_month(&input.month)?;

        let teacher = self.teachers.get_by_id(&input.teacher_id).await?;
        if teacher.is_deleted {
            return Err(AppError::BadRequest(format!(
                "teacher {} is archived",
                input.teacher_id
            )));
        }

        let model = teacher_payment::ActiveModel {
            id: Set(self.id_gen.generate()),
            teacher_id: Set(input.teacher_id),
            amount: Set(input.amount),
            month: Set(input.month),
            recorded_by: Set(recorded_by.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        self.teacher_payments.create(model).await
    }

    /// A student's fee payment history, newest first.
    pub async fn student_history(
        &self,
        student_id: &str,
    ) -> AppResult<Vec<student_payment::Model>> {
        self.student_payments
            .find_by_student(student_id, HISTORY_LIMIT)
            .await
    }

    /// A teacher's salary history, newest first.
    pub async fn teacher_history(
        &self,
        teacher_id: &str,
    ) -> AppResult<Vec<teacher_payment::Model>> {
        self.teacher_payments
            .find_by_teacher(teacher_id, HISTORY_LIMIT)
            .await
    }
}

/// Require `YYYY-MM` with a valid month number.
fn validate_month(month: &str) -> AppResult<()> {
    let valid = month.len() == 7
        && month.as_bytes()[4] == b'-'
        && month[..4].chars().all(|c| c.is_ascii_digit())
        && month[5..].chars().all(|c| c.is_ascii_digit())
        && matches!(month[5..].parse::<u8>(), Ok(1..=12));

    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "invalid month {month:?}, expected YYYY-MM"
        )))
    }
}
