//! Enrollment repository.

use std::sync::Arc;

use crate::entities::{Enrollment, enrollment, enrollment::EnrollmentStatus};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Enrollment repository for database reads.
#[derive(Clone)]
pub struct EnrollmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an enrollment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<enrollment::Model>> {
        Enrollment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an enrollment by its natural key.
    pub async fn find_by_student_and_batch(
        &self,
        student_id: &str,
        batch_id: &str,
    ) -> AppResult<Option<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List enrollments in a batch.
    pub async fn list_for_batch(&self, batch_id: &str) -> AppResult<Vec<enrollment::Model>> {
        Enrollment::find()
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active enrollments in a batch.
    pub async fn count_active_for_batch(&self, batch_id: &str) -> AppResult<u64> {
        Enrollment::find()
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
