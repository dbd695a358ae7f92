//! Invoice worker.

use apalis::prelude::*;
use campus_core::InvoiceService;
use tracing::{error, info, warn};

use crate::jobs::InvoiceJob;
use crate::retry::{DeadLetterEntry, RetryConfig};

/// Context for the invoice worker.
#[derive(Clone)]
pub struct InvoiceContext {
    /// Invoice generation service.
    pub invoices: InvoiceService,
    /// Retry policy for failed generation attempts.
    pub retry: RetryConfig,
}

impl InvoiceContext {
    /// Create a new invoice context with the default retry policy.
    #[must_use]
    pub fn new(invoices: InvoiceService) -> Self {
        Self {
            invoices,
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Worker function for generating invoices.
///
/// Generation is idempotent against the committed payment row, so apalis
/// retries of this job never produce a second invoice. A job that exhausts
/// the retry policy is logged as a dead letter and aborted.
///
/// # Errors
/// Returns an error if invoice generation fails.
pub async fn invoice_worker(
    job: InvoiceJob,
    attempt: Attempt,
    ctx: Data<InvoiceContext>,
) -> Result<(), Error> {
    info!(payment_id = %job.payment_id, "Generating invoice");

    match ctx.invoices.generate(&job.payment_id).await {
        Ok(payment) => {
            info!(
                payment_id = %job.payment_id,
                invoice_number = ?payment.invoice_number,
                "Invoice generated"
            );
            Ok(())
        }
        Err(e) => {
            let attempts = u32::try_from(attempt.current()).unwrap_or(u32::MAX);
            error!(payment_id = %job.payment_id, attempts, error = %e, "Failed to generate invoice");

            let message = e.to_string();
            let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
            if ctx.retry.should_retry(attempts) {
                Err(Error::Failed(boxed.into()))
            } else {
                let entry = DeadLetterEntry::new(job, attempts, message);
                warn!(dead_letter = ?entry, "Invoice job exhausted its retries");
                Err(Error::Abort(boxed.into()))
            }
        }
    }
}
