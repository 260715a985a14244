//! Database repositories.

pub mod attendance;
pub mod class_section;
pub mod enrollment;
pub mod payment;
pub mod student;
pub mod teacher;
pub mod user;

pub use attendance::AttendanceRepository;
pub use class_section::ClassSectionRepository;
pub use enrollment::EnrollmentRepository;
pub use payment::{StudentPaymentRepository, TeacherPaymentRepository};
pub use student::StudentRepository;
pub use teacher::TeacherRepository;
pub use user::UserRepository;

use institute_common::RelatedRecords;

/// Result of a transactional cascade deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Dependent rows removed (or unassigned), per category.
    pub removed: RelatedRecords,
    /// Whether the entity row itself was removed.
    pub entity_removed: bool,
}
