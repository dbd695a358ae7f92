//! Attendance repository.

use std::sync::Arc;

use crate::entities::{Attendance, attendance};
use campus_common::{AppError, AppResult};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Attendance repository for database reads.
#[derive(Clone)]
pub struct AttendanceRepository {
    db: Arc<DatabaseConnection>,
}

impl AttendanceRepository {
    /// Create a new attendance repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List attendance records for a batch on a date.
    pub async fn list_for_batch_date(
        &self,
        batch_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<attendance::Model>> {
        Attendance::find()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .filter(attendance::Column::Date.eq(date))
            .order_by_asc(attendance::Column::StudentId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a student's attendance history in a batch.
    pub async fn list_for_student(
        &self,
        batch_id: &str,
        student_id: &str,
    ) -> AppResult<Vec<attendance::Model>> {
        Attendance::find()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .filter(attendance::Column::StudentId.eq(student_id))
            .order_by_desc(attendance::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
