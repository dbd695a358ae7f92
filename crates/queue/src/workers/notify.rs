//! Notify worker.

use apalis::prelude::*;
use campus_core::NotificationDispatcher;
use campus_db::repositories::NotificationRepository;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::jobs::NotifyJob;
use crate::retry::{DeadLetterEntry, RetryConfig};

/// Context for the notify worker.
#[derive(Clone)]
pub struct NotifyContext {
    /// Notification repository.
    pub notifications: NotificationRepository,
    /// Delivery channel (email/push).
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    /// Retry policy for failed dispatch attempts.
    pub retry: RetryConfig,
}

impl NotifyContext {
    /// Create a new notify context with the default retry policy.
    #[must_use]
    pub fn new(
        notifications: NotificationRepository,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
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

/// Worker function for delivering notifications.
///
/// A missing or already-sent notification is a no-op, so retried jobs never
/// deliver twice. A job that exhausts the retry policy is logged as a dead
/// letter and aborted; the unsent row stays visible to `list_unsent`.
///
/// # Errors
/// Returns an error if dispatch fails.
pub async fn notify_worker(
    job: NotifyJob,
    attempt: Attempt,
    ctx: Data<NotifyContext>,
) -> Result<(), Error> {
    info!(notification_id = %job.notification_id, "Dispatching notification");

    match dispatch_notification(&job, &ctx).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let attempts = u32::try_from(attempt.current()).unwrap_or(u32::MAX);
            error!(notification_id = %job.notification_id, attempts, error = %e, "Failed to dispatch notification");

            if ctx.retry.should_retry(attempts) {
                Err(Error::Failed(e.into()))
            } else {
                let message = e.to_string();
                let entry = DeadLetterEntry::new(job, attempts, message);
                warn!(dead_letter = ?entry, "Notify job exhausted its retries");
                Err(Error::Abort(e.into()))
            }
        }
    }
}

async fn dispatch_notification(
    job: &NotifyJob,
    ctx: &NotifyContext,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(notification) = ctx.notifications.find_by_id(&job.notification_id).await? else {
        warn!(notification_id = %job.notification_id, "Notification row missing, dropping job");
        return Ok(());
    };

    if notification.sent_at.is_some() {
        return Ok(());
    }

    ctx.dispatcher.dispatch(&notification).await?;
    ctx.notifications.mark_sent(&notification.id).await?;

    Ok(())
}
