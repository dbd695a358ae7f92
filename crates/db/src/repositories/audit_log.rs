//! Audit log repository.

use std::sync::Arc;

use crate::entities::{AuditLog, audit_log};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Audit log repository for database reads.
#[derive(Clone)]
pub struct AuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List audit entries for an entity, newest first.
    pub async fn list_for_entity(
        &self,
        entity: &str,
        entity_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        AuditLog::find()
            .filter(audit_log::Column::Entity.eq(entity))
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List audit entries written by a user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        AuditLog::find()
            .filter(audit_log::Column::UserId.eq(user_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
