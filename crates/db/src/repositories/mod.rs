//! Database repositories.
//!
//! Pool-bound read/list helpers per entity. Transactional writes live in the
//! workflow services, which operate on the transaction handle directly.

mod attendance;
mod audit_log;
mod batch;
mod enrollment;
mod notification;
mod payment;
mod registration;

pub use attendance::AttendanceRepository;
pub use audit_log::AuditLogRepository;
pub use batch::BatchRepository;
pub use enrollment::EnrollmentRepository;
pub use notification::NotificationRepository;
pub use payment::PaymentRepository;
pub use registration::RegistrationRepository;
