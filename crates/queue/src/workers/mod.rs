//! Worker implementations.

pub mod invoice;
pub mod notify;

pub use invoice::{InvoiceContext, invoice_worker};
pub use notify::{NotifyContext, notify_worker};
