//! Business services.

pub mod account;
pub mod audit;
pub mod class;
pub mod deletion;
pub mod payment;
pub mod student;
pub mod teacher;

pub use account::{AccountService, CreateAccountInput};
pub use audit::AuditPhase;
pub use class::{ClassService, CreateSectionInput, EnrollInput, RecordAttendanceInput};
pub use deletion::{AuthContext, DeletionService, DeletionTarget, validate_deletion_permission};
pub use payment::{PaymentService, StudentPaymentInput, TeacherPaymentInput};
pub use student::{CreateStudentInput, StudentDeletionTarget, StudentService, UpdateStudentInput};
pub use teacher::{
    CreateTeacherInput, ReassignTeacherInput, TeacherDeletionTarget, TeacherService,
    UpdateTeacherInput,
};
