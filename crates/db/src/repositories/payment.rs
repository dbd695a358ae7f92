//! Payment repository.

use std::sync::Arc;

use crate::entities::{Payment, payment, payment::PaymentStatus};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Payment repository for database reads.
#[derive(Clone)]
pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl PaymentRepository {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a payment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<payment::Model>> {
        Payment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a payment by its external transaction reference.
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> AppResult<Option<payment::Model>> {
        Payment::find()
            .filter(payment::Column::TransactionId.eq(transaction_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List payments awaiting review, oldest first.
    pub async fn list_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<payment::Model>> {
        Payment::find()
            .filter(payment::Column::Status.eq(PaymentStatus::Pending))
            .order_by_asc(payment::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List payments for an enrollment.
    pub async fn list_for_enrollment(&self, enrollment_id: &str) -> AppResult<Vec<payment::Model>> {
        Payment::find()
            .filter(payment::Column::EnrollmentId.eq(enrollment_id))
            .order_by_desc(payment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
