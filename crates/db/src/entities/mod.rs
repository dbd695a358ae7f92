//! Database entities.

pub mod attendance;
pub mod audit_log;
pub mod batch;
pub mod course;
pub mod enrollment;
pub mod notification;
pub mod payment;
pub mod registration;

pub use attendance::Entity as Attendance;
pub use audit_log::Entity as AuditLog;
pub use batch::Entity as Batch;
pub use course::Entity as Course;
pub use enrollment::Entity as Enrollment;
pub use notification::Entity as Notification;
pub use payment::Entity as Payment;
pub use registration::Entity as Registration;
