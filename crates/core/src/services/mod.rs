//! Workflow services.

pub mod attendance;
pub mod audit;
pub mod capacity;
pub mod enrollment;
pub mod invoice;
pub mod notification;
pub mod payment;
pub mod registration;
pub mod side_effects;

pub use attendance::{AttendanceMarker, BulkMarkOutcome};
pub use audit::AuditRecorder;
pub use capacity::EnrollmentCapacityChecker;
pub use enrollment::EnrollmentService;
pub use invoice::{InvoiceRenderer, InvoiceService, InvoiceStore, NoOpRenderer, NoOpStore};
pub use notification::{NotificationDispatcher, NotificationService};
pub use payment::{IdempotencyStore, PaymentOutcome, PaymentWorkflow};
pub use registration::{RegistrationOutcome, RegistrationWorkflow};
pub use side_effects::{NoOpSideEffects, SideEffects, SideEffectsHandle};
