//! Notification delivery job.

use serde::{Deserialize, Serialize};

/// Job to deliver one committed notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyJob {
    /// The notification row to deliver.
    pub notification_id: String,
}

impl NotifyJob {
    /// Create a new notify job.
    #[must_use]
    pub const fn new(notification_id: String) -> Self {
        Self { notification_id }
    }
}
