//! Attendance marking.
//!
//! Bulk marking is a set-difference plus bulk-insert: already-marked
//! students are skipped, only the complement is inserted, and the call is
//! safely repeatable for the same `(batch, date)`.

use campus_common::{AppError, AppResult};
use campus_db::entities::{
    Attendance, Batch, Enrollment, attendance, attendance::AttendanceStatus, batch, enrollment,
    enrollment::EnrollmentStatus,
};
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Counts reported by a bulk marking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkMarkOutcome {
    /// Rows inserted by this call.
    pub marked: u64,
    /// Students skipped because they were already marked for the date.
    pub skipped: u64,
    /// Students in the resolved target set.
    pub total: u64,
}

/// Attendance marking service.
#[derive(Clone)]
pub struct AttendanceMarker {
    db: Arc<DatabaseConnection>,
}

impl AttendanceMarker {
    /// Create a new attendance marker.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Mark attendance for one student on one date.
    pub async fn mark_one(
        &self,
        batch_id: &str,
        student_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        marked_by: &str,
        notes: Option<&str>,
    ) -> AppResult<attendance::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::load_live_batch(&txn, batch_id).await?;

        let enrolled = Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if enrolled.is_none() {
            return Err(AppError::BadRequest(format!(
                "student {student_id} is not enrolled in batch {batch_id}"
            )));
        }

        let existing = Attendance::find()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .filter(attendance::Column::StudentId.eq(student_id))
            .filter(attendance::Column::Date.eq(date))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::AlreadyMarked(format!(
                "student {student_id} on {date}"
            )));
        }

        let model = attendance::ActiveModel {
            id: Set(crate::generate_id()),
            batch_id: Set(batch_id.to_string()),
            student_id: Set(student_id.to_string()),
            date: Set(date),
            status: Set(status),
            marked_by: Set(marked_by.to_string()),
            notes: Set(notes.map(String::from)),
            created_at: Set(chrono::Utc::now().into()),
        };

        // The unique index backstops the pre-check under concurrent marking.
        let created = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                AppError::AlreadyMarked(format!("student {student_id} on {date}"))
            }
            _ => AppError::Database(e.to_string()),
        })?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Mark attendance for a set of students on one date.
    ///
    /// The target set is the explicit `student_ids` intersected with active
    /// enrollments in the batch, or all active enrollments if none are
    /// given. Already-marked students are skipped, not errors.
    pub async fn mark_bulk(
        &self,
        batch_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        marked_by: &str,
        student_ids: Option<&[String]>,
        notes: Option<&str>,
    ) -> AppResult<BulkMarkOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::load_live_batch(&txn, batch_id).await?;

        let roster: Vec<String> = Enrollment::find()
            .filter(enrollment::Column::BatchId.eq(batch_id))
            .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|e| e.student_id)
            .collect();

        let resolved: Vec<String> = match student_ids {
            Some(ids) => {
                let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
                roster
                    .into_iter()
                    .filter(|s| requested.contains(s.as_str()))
                    .collect()
            }
            None => roster,
        };

        if resolved.is_empty() {
            return Err(AppError::NoStudents);
        }

        let already_marked: HashSet<String> = Attendance::find()
            .filter(attendance::Column::BatchId.eq(batch_id))
            .filter(attendance::Column::Date.eq(date))
            .filter(attendance::Column::StudentId.is_in(resolved.clone()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|a| a.student_id)
            .collect();

        let to_mark: Vec<&String> = resolved
            .iter()
            .filter(|s| !already_marked.contains(s.as_str()))
            .collect();

        if to_mark.is_empty() {
            return Err(AppError::AllAlreadyMarked {
                skipped: already_marked.len() as u64,
            });
        }

        let now = chrono::Utc::now();
        let models: Vec<attendance::ActiveModel> = to_mark
            .iter()
            .map(|student_id| attendance::ActiveModel {
                id: Set(crate::generate_id()),
                batch_id: Set(batch_id.to_string()),
                student_id: Set((*student_id).clone()),
                date: Set(date),
                status: Set(status),
                marked_by: Set(marked_by.to_string()),
                notes: Set(notes.map(String::from)),
                created_at: Set(now.into()),
            })
            .collect();

        // One statement; rows racing in after the set-difference are
        // silently skipped by the unique index instead of failing the batch.
        Attendance::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    attendance::Column::StudentId,
                    attendance::Column::BatchId,
                    attendance::Column::Date,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let outcome = BulkMarkOutcome {
            marked: to_mark.len() as u64,
            skipped: already_marked.len() as u64,
            total: resolved.len() as u64,
        };

        info!(
            batch_id = %batch_id,
            date = %date,
            marked = outcome.marked,
            skipped = outcome.skipped,
            "Bulk attendance marked"
        );

        Ok(outcome)
    }

    /// List attendance records for a batch on a date.
    pub async fn list_for_batch_date(
        &self,
        batch_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<attendance::Model>> {
        campus_db::repositories::AttendanceRepository::new(self.db.clone())
            .list_for_batch_date(batch_id, date)
            .await
    }

    async fn load_live_batch(txn: &DatabaseTransaction, batch_id: &str) -> AppResult<batch::Model> {
        let found = Batch::find_by_id(batch_id)
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match found {
            Some(b) if b.is_live() => Ok(b),
            _ => Err(AppError::NotFound(format!("batch {batch_id} not found"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_db::entities::{batch::BatchStatus, payment::PaymentStatus};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_batch() -> batch::Model {
        batch::Model {
            id: "batch-1".to_string(),
            course_id: "course-1".to_string(),
            name: "Morning cohort".to_string(),
            capacity: 30,
            status: BatchStatus::Ongoing,
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end_date: None,
            deleted_at: None,
            created_at: Utc::now().into(),
        }
    }

    fn test_enrollment(student_id: &str) -> enrollment::Model {
        enrollment::Model {
            id: format!("enr-{student_id}"),
            student_id: student_id.to_string(),
            batch_id: "batch-1".to_string(),
            status: EnrollmentStatus::Active,
            payment_status: PaymentStatus::Approved,
            enrolled_at: Some(Utc::now().into()),
            created_at: Utc::now().into(),
        }
    }

    fn test_attendance(student_id: &str, date: NaiveDate) -> attendance::Model {
        attendance::Model {
            id: format!("att-{student_id}"),
            batch_id: "batch-1".to_string(),
            student_id: student_id.to_string(),
            date,
            status: AttendanceStatus::Present,
            marked_by: "teacher-1".to_string(),
            notes: None,
            created_at: Utc::now().into(),
        }
    }

    fn mark_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    #[tokio::test]
    async fn test_mark_one_already_marked() {
        let date = mark_date();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([vec![test_enrollment("s1")]])
                .append_query_results([vec![test_attendance("s1", date)]])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let result = marker
            .mark_one("batch-1", "s1", date, AttendanceStatus::Present, "teacher-1", None)
            .await;

        assert!(matches!(result, Err(AppError::AlreadyMarked(_))));
    }

    #[tokio::test]
    async fn test_mark_one_requires_enrollment() {
        let date = mark_date();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([Vec::<enrollment::Model>::new()])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let result = marker
            .mark_one("batch-1", "s9", date, AttendanceStatus::Present, "teacher-1", None)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_mark_one_inserts_record() {
        let date = mark_date();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([vec![test_enrollment("s1")]])
                .append_query_results([Vec::<attendance::Model>::new()])
                .append_query_results([vec![test_attendance("s1", date)]])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let created = marker
            .mark_one("batch-1", "s1", date, AttendanceStatus::Present, "teacher-1", None)
            .await
            .unwrap();

        assert_eq!(created.student_id, "s1");
        assert_eq!(created.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_mark_bulk_no_students() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([Vec::<enrollment::Model>::new()])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let result = marker
            .mark_bulk(
                "batch-1",
                mark_date(),
                AttendanceStatus::Present,
                "teacher-1",
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::NoStudents)));
    }

    #[tokio::test]
    async fn test_mark_bulk_all_already_marked() {
        let date = mark_date();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([vec![test_enrollment("s1"), test_enrollment("s2")]])
                .append_query_results([vec![
                    test_attendance("s1", date),
                    test_attendance("s2", date),
                ]])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let result = marker
            .mark_bulk("batch-1", date, AttendanceStatus::Present, "teacher-1", None, None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::AllAlreadyMarked { skipped: 2 })
        ));
    }

    #[tokio::test]
    async fn test_mark_bulk_marks_only_complement() {
        let date = mark_date();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([vec![test_enrollment("s1"), test_enrollment("s2")]])
                .append_query_results([vec![test_attendance("s1", date)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let outcome = marker
            .mark_bulk("batch-1", date, AttendanceStatus::Present, "teacher-1", None, None)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BulkMarkOutcome {
                marked: 1,
                skipped: 1,
                total: 2
            }
        );
    }

    #[tokio::test]
    async fn test_mark_bulk_intersects_explicit_ids_with_roster() {
        let date = mark_date();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_batch()]])
                .append_query_results([vec![test_enrollment("s1"), test_enrollment("s2")]])
                .append_query_results([Vec::<attendance::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        // s3 is not enrolled; only s1 survives the intersection
        let ids = vec!["s1".to_string(), "s3".to_string()];
        let outcome = marker
            .mark_bulk(
                "batch-1",
                date,
                AttendanceStatus::Absent,
                "teacher-1",
                Some(&ids),
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BulkMarkOutcome {
                marked: 1,
                skipped: 0,
                total: 1
            }
        );
    }

    #[tokio::test]
    async fn test_mark_bulk_batch_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<batch::Model>::new()])
                .into_connection(),
        );

        let marker = AttendanceMarker::new(db);
        let result = marker
            .mark_bulk(
                "missing",
                mark_date(),
                AttendanceStatus::Present,
                "teacher-1",
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
