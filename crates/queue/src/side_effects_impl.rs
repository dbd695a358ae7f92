//! Redis-backed side-effect queueing.
//!
//! Implements the core `SideEffects` trait by pushing jobs to apalis Redis
//! storage for the invoice and notify workers to process.

use async_trait::async_trait;
use campus_common::{AppError, AppResult};
use campus_core::SideEffects;

use crate::jobs::{InvoiceJob, NotifyJob};

/// Redis-backed side-effect queue.
#[derive(Clone)]
pub struct RedisSideEffects {
    invoice_storage: apalis_redis::RedisStorage<InvoiceJob>,
    notify_storage: apalis_redis::RedisStorage<NotifyJob>,
}

impl RedisSideEffects {
    /// Create a new Redis side-effect queue.
    pub const fn new(
        invoice_storage: apalis_redis::RedisStorage<InvoiceJob>,
        notify_storage: apalis_redis::RedisStorage<NotifyJob>,
    ) -> Self {
        Self {
            invoice_storage,
            notify_storage,
        }
    }
}

#[async_trait]
impl SideEffects for RedisSideEffects {
    async fn queue_invoice(&self, payment_id: &str) -> AppResult<()> {
        use apalis::prelude::*;

        self.invoice_storage
            .clone()
            .push(InvoiceJob::new(payment_id.to_string()))
            .await
            .map_err(|e| AppError::Queue(format!("Failed to queue invoice job: {e}")))?;

        tracing::debug!(payment_id = %payment_id, "Queued invoice job");

        Ok(())
    }

    async fn queue_notification(&self, notification_id: &str) -> AppResult<()> {
        use apalis::prelude::*;

        self.notify_storage
            .clone()
            .push(NotifyJob::new(notification_id.to_string()))
            .await
            .map_err(|e| AppError::Queue(format!("Failed to queue notify job: {e}")))?;

        tracing::debug!(notification_id = %notification_id, "Queued notify job");

        Ok(())
    }
}
