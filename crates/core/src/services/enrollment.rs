//! Enrollment service.
//!
//! The manual-enroll path: capacity is checked and the row inserted in the
//! same transaction, with the batch row locked, so concurrent enroll
//! attempts cannot oversubscribe a batch.

use campus_common::{AppError, AppResult};
use campus_db::entities::{
    Batch, Enrollment, enrollment, enrollment::EnrollmentStatus, payment::PaymentStatus,
};
use campus_db::repositories::EnrollmentRepository;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::audit::AuditRecorder;
use super::capacity::EnrollmentCapacityChecker;

/// Enrollment service for direct (non-registration) enrollment.
#[derive(Clone)]
pub struct EnrollmentService {
    db: Arc<DatabaseConnection>,
    enrollments: EnrollmentRepository,
}

impl EnrollmentService {
    /// Create a new enrollment service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let enrollments = EnrollmentRepository::new(db.clone());
        Self { db, enrollments }
    }

    /// Enroll a student into a batch directly.
    ///
    /// The enrollment starts with `payment_status = Pending`; payment
    /// approval settles it later.
    pub async fn enroll(
        &self,
        student_id: &str,
        batch_id: &str,
        actor_id: &str,
    ) -> AppResult<enrollment::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let target = Batch::find_by_id(batch_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let target = match target {
            Some(b) if b.is_live() => b,
            _ => return Err(AppError::NotFound(format!("batch {batch_id} not found"))),
        };

        let existing = Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "student {student_id} is already enrolled in batch {batch_id}"
            )));
        }

        EnrollmentCapacityChecker::check(&txn, &target).await?;

        let now = chrono::Utc::now();
        let model = enrollment::ActiveModel {
            id: Set(crate::generate_id()),
            student_id: Set(student_id.to_string()),
            batch_id: Set(batch_id.to_string()),
            status: Set(EnrollmentStatus::Active),
            payment_status: Set(PaymentStatus::Pending),
            enrolled_at: Set(Some(now.into())),
            created_at: Set(now.into()),
        };

        let created = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(format!(
                "student {student_id} is already enrolled in batch {batch_id}"
            )),
            _ => AppError::Database(e.to_string()),
        })?;

        AuditRecorder::record(
            &txn,
            actor_id,
            "enrollment.create",
            "enrollment",
            &created.id,
            None,
            Some(json!({ "student_id": student_id, "batch_id": batch_id })),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(enrollment_id = %created.id, batch_id = %batch_id, "Student enrolled");

        Ok(created)
    }

    /// Get an enrollment by ID.
    pub async fn get(&self, id: &str) -> AppResult<enrollment::Model> {
        self.enrollments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("enrollment {id} not found")))
    }

    /// List enrollments in a batch.
    pub async fn list_for_batch(&self, batch_id: &str) -> AppResult<Vec<enrollment::Model>> {
        self.enrollments.list_for_batch(batch_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_db::entities::{audit_log, batch, batch::BatchStatus};
    use chrono::{NaiveDate, Utc};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_batch(capacity: i32) -> batch::Model {
        batch::Model {
            id: "batch-1".to_string(),
            course_id: "course-1".to_string(),
            name: "Morning cohort".to_string(),
            capacity,
            status: BatchStatus::Upcoming,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: None,
            deleted_at: None,
            created_at: Utc::now().into(),
        }
    }

    fn test_enrollment() -> enrollment::Model {
        enrollment::Model {
            id: "enr-1".to_string(),
            student_id: "student-1".to_string(),
            batch_id: "batch-1".to_string(),
            status: EnrollmentStatus::Active,
            payment_status: PaymentStatus::Pending,
            enrolled_at: Some(Utc::now().into()),
            created_at: Utc::now().into(),
        }
    }

    fn audit_row() -> audit_log::Model {
        audit_log::Model {
            id: "audit-1".to_string(),
            user_id: "admin-1".to_string(),
            action: "enrollment.create".to_string(),
            entity: "enrollment".to_string(),
            entity_id: "enr-1".to_string(),
            old_value: None,
            new_value: None,
            created_at: Utc::now().into(),
        }
    }

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    #[tokio::test]
    async fn test_enroll_batch_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<batch::Model>::new()])
                .into_connection(),
        );

        let service = EnrollmentService::new(db);
        let result = service.enroll("student-1", "missing", "admin-1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_enroll_duplicate_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch(30)]])
                .append_query_results([vec![test_enrollment()]])
                .into_connection(),
        );

        let service = EnrollmentService::new(db);
        let result = service.enroll("student-1", "batch-1", "admin-1").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_enroll_capacity_exceeded() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch(1)]])
                .append_query_results([Vec::<enrollment::Model>::new()])
                .append_query_results([count_result(1)])
                .into_connection(),
        );

        let service = EnrollmentService::new(db);
        let result = service.enroll("student-1", "batch-1", "admin-1").await;

        assert!(matches!(result, Err(AppError::CapacityExceeded(_))));
    }

    #[tokio::test]
    async fn test_enroll_creates_pending_payment_enrollment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch(30)]])
                .append_query_results([Vec::<enrollment::Model>::new()])
                .append_query_results([count_result(3)])
                .append_query_results([vec![test_enrollment()]])
                .append_query_results([vec![audit_row()]])
                .into_connection(),
        );

        let service = EnrollmentService::new(db);
        let created = service
            .enroll("student-1", "batch-1", "admin-1")
            .await
            .unwrap();

        assert_eq!(created.status, EnrollmentStatus::Active);
        assert_eq!(created.payment_status, PaymentStatus::Pending);
    }
}
