//! Enrollment capacity checker.
//!
//! Counts enrollments against a batch's capacity. Generic over the
//! connection so the check runs inside the caller's transaction; callers
//! must lock the batch row first so the check-then-insert is atomic under
//! concurrent enroll attempts.

use campus_common::{AppError, AppResult};
use campus_db::entities::{Enrollment, enrollment, enrollment::EnrollmentStatus};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

/// Read-time enforcement of the capacity invariant.
pub struct EnrollmentCapacityChecker;

impl EnrollmentCapacityChecker {
    /// Count enrollments occupying a seat in the batch. Dropped enrollments
    /// free their seat.
    pub async fn occupied<C: ConnectionTrait>(conn: &C, batch_id: &str) -> AppResult<u64> {
        Enrollment::find()
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .filter(enrollment::Column::Status.ne(EnrollmentStatus::Dropped))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether the batch can take one more enrollment.
    pub async fn has_room<C: ConnectionTrait>(
        conn: &C,
        batch: &campus_db::entities::batch::Model,
    ) -> AppResult<bool> {
        let capacity = u64::try_from(batch.capacity).unwrap_or(0);
        let occupied = Self::occupied(conn, &batch.id).await?;
        Ok(occupied < capacity)
    }

    /// Assert the batch has room, failing with `CapacityExceeded` otherwise.
    pub async fn check<C: ConnectionTrait>(
        conn: &C,
        batch: &campus_db::entities::batch::Model,
    ) -> AppResult<()> {
        if Self::has_room(conn, batch).await? {
            Ok(())
        } else {
            Err(AppError::CapacityExceeded(format!(
                "batch {} is at capacity ({})",
                batch.id, batch.capacity
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_db::entities::batch::{self, BatchStatus};
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

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    #[tokio::test]
    async fn test_has_room_below_capacity() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(2)])
            .into_connection();

        let batch = test_batch(30);
        assert!(EnrollmentCapacityChecker::has_room(&db, &batch).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_fails_at_capacity() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(1)])
            .into_connection();

        let batch = test_batch(1);
        let result = EnrollmentCapacityChecker::check(&db, &batch).await;

        assert!(matches!(result, Err(AppError::CapacityExceeded(_))));
    }

    #[tokio::test]
    async fn test_zero_capacity_has_no_room() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(0)])
            .into_connection();

        let batch = test_batch(0);
        assert!(!EnrollmentCapacityChecker::has_room(&db, &batch).await.unwrap());
    }
}
