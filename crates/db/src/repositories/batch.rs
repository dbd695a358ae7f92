//! Batch repository.

use std::sync::Arc;

use crate::entities::{Batch, batch, batch::BatchStatus};
use campus_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Batch repository for database reads.
#[derive(Clone)]
pub struct BatchRepository {
    db: Arc<DatabaseConnection>,
}

impl BatchRepository {
    /// Create a new batch repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a batch by ID, excluding soft-deleted rows.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<batch::Model>> {
        Batch::find_by_id(id)
            .filter(batch::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List upcoming batches for a course, earliest start first.
    pub async fn list_upcoming_for_course(&self, course_id: &str) -> AppResult<Vec<batch::Model>> {
        Batch::find()
            .filter(batch::Column::CourseId.eq(course_id))
            .filter(batch::Column::Status.eq(BatchStatus::Upcoming))
            .filter(batch::Column::DeletedAt.is_null())
            .order_by_asc(batch::Column::StartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
