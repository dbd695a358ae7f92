//! Job definitions.

pub mod invoice;
pub mod notify;

pub use invoice::InvoiceJob;
pub use notify::NotifyJob;
