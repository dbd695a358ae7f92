//! Notification service.
//!
//! Notification rows are written inside workflow transactions; a separate
//! dispatcher module (email/push, out of scope here) consumes them via the
//! [`NotificationDispatcher`] boundary and marks them sent.

use async_trait::async_trait;
use campus_common::{AppError, AppResult};
use campus_db::entities::{notification, notification::NotificationKind};
use campus_db::repositories::NotificationRepository;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set};
use std::sync::Arc;

/// Notification service for creating and reading notification rows.
#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            repo: NotificationRepository::new(db),
        }
    }

    /// Insert a notification row inside the caller's transaction.
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        body: &str,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(user_id.to_string()),
            kind: Set(kind),
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            is_read: Set(false),
            sent_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.repo.list_for_user(user_id, limit, offset).await
    }

    /// List notifications awaiting delivery.
    pub async fn list_unsent(&self, limit: u64) -> AppResult<Vec<notification::Model>> {
        self.repo.list_unsent(limit).await
    }

    /// Record that a notification was handed to a delivery channel.
    pub async fn mark_sent(&self, id: &str) -> AppResult<notification::Model> {
        self.repo.mark_sent(id).await
    }

    /// Mark a notification as read by its recipient.
    pub async fn mark_as_read(&self, id: &str, user_id: &str) -> AppResult<notification::Model> {
        self.repo.mark_as_read(id, user_id).await
    }

    /// Count a user's unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.repo.count_unread(user_id).await
    }
}

/// Trait for delivering notifications to an external channel.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one notification. Implementations own their retry policy.
    async fn dispatch(&self, notification: &notification::Model) -> AppResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn notification_row() -> notification::Model {
        notification::Model {
            id: "notif-1".to_string(),
            user_id: "student-1".to_string(),
            kind: NotificationKind::PaymentApproved,
            title: "Payment approved".to_string(),
            body: "Your payment was approved.".to_string(),
            is_read: false,
            sent_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_in_inserts_unread_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[notification_row()]])
            .into_connection();

        let created = NotificationService::create_in(
            &db,
            "student-1",
            NotificationKind::PaymentApproved,
            "Payment approved",
            "Your payment was approved.",
        )
        .await
        .unwrap();

        assert_eq!(created.kind, NotificationKind::PaymentApproved);
        assert!(!created.is_read);
        assert!(created.sent_at.is_none());
    }
}
