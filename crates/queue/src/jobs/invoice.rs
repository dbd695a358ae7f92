//! Invoice generation job.

use serde::{Deserialize, Serialize};

/// Job to generate the invoice for an approved payment.
///
/// Carries only the payment ID: the worker re-reads the committed payment
/// row, so a stale or duplicate job is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceJob {
    /// The approved payment to invoice.
    pub payment_id: String,
}

impl InvoiceJob {
    /// Create a new invoice job.
    #[must_use]
    pub const fn new(payment_id: String) -> Self {
        Self { payment_id }
    }
}
