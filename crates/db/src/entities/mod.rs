//! Database entities.

pub mod attendance;
pub mod class_section;
pub mod enrollment;
pub mod student;
pub mod student_payment;
pub mod teacher;
pub mod teacher_payment;
pub mod user;

pub use attendance::Entity as Attendance;
pub use class_section::Entity as ClassSection;
pub use enrollment::Entity as Enrollment;
pub use student::Entity as Student;
pub use student_payment::Entity as StudentPayment;
pub use teacher::Entity as Teacher;
pub use teacher_payment::Entity as TeacherPayment;
pub use user::Entity as User;
