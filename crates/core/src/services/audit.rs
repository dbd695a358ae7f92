//! Audit recorder.
//!
//! Append-only writer of state-transition records. `record` is generic over
//! the connection so it always joins the caller's transaction: a rollback of
//! the business change also rolls back its audit trail.

use campus_common::{AppError, AppResult};
use campus_db::entities::audit_log;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

/// Writes one audit entry per state-changing operation.
pub struct AuditRecorder;

impl AuditRecorder {
    /// Record a state transition inside the caller's transaction.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        actor_id: &str,
        action: &str,
        entity: &str,
        entity_id: &str,
        old_value: Option<serde_json::Value>,
        new_value: Option<serde_json::Value>,
    ) -> AppResult<audit_log::Model> {
        let model = audit_log::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(actor_id.to_string()),
            action: Set(action.to_string()),
            entity: Set(entity.to_string()),
            entity_id: Set(entity_id.to_string()),
            old_value: Set(old_value),
            new_value: Set(new_value),
            created_at: Set(chrono::Utc::now().into()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
