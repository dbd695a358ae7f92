//! Post-commit side-effect queueing.
//!
//! Provides an abstraction for enqueueing durable post-commit work (invoice
//! generation, notification dispatch). The actual implementation is provided
//! by the queue crate; workflows call these strictly after commit and treat
//! failures as best-effort.

use async_trait::async_trait;
use campus_common::AppResult;
use std::sync::Arc;

/// Trait for queueing post-commit side effects.
///
/// This allows the workflow services to enqueue durable jobs without
/// directly depending on the queue implementation.
#[async_trait]
pub trait SideEffects: Send + Sync {
    /// Queue invoice generation for an approved payment.
    async fn queue_invoice(&self, payment_id: &str) -> AppResult<()>;

    /// Queue delivery of a notification row.
    async fn queue_notification(&self, notification_id: &str) -> AppResult<()>;
}

/// A no-op implementation for testing or when no queue is configured.
#[derive(Clone, Default)]
pub struct NoOpSideEffects;

#[async_trait]
impl SideEffects for NoOpSideEffects {
    async fn queue_invoice(&self, _payment_id: &str) -> AppResult<()> {
        Ok(())
    }

    async fn queue_notification(&self, _notification_id: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed SideEffects trait object.
pub type SideEffectsHandle = Arc<dyn SideEffects>;
