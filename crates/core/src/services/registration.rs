//! Registration approval workflow.
//!
//! Moves a registration through the three-step review sequence
//! `Pending -> AcademicReviewed -> FinancialVerified -> Approved`, with
//! `Rejected` reachable from any non-terminal state. Each step requires the
//! exact predecessor status and runs check-then-write inside one transaction
//! with the registration row locked.

use campus_common::{AppError, AppResult};
use campus_db::entities::{
    Batch, Course, Enrollment, Registration, batch, batch::BatchStatus, course, enrollment,
    enrollment::EnrollmentStatus, notification, notification::NotificationKind,
    payment::PaymentStatus,
    registration, registration::RegistrationStatus,
};
use campus_db::repositories::RegistrationRepository;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use super::audit::AuditRecorder;
use super::capacity::EnrollmentCapacityChecker;
use super::notification::NotificationService;
use super::side_effects::{NoOpSideEffects, SideEffectsHandle};

/// Result of a final-approval step: the updated registration plus the
/// enrollment created when the decision was approval.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// The registration after the transition.
    pub registration: registration::Model,
    /// Enrollment created by approval, `None` on rejection.
    pub enrollment: Option<enrollment::Model>,
}

/// Registration approval workflow service.
#[derive(Clone)]
pub struct RegistrationWorkflow {
    db: Arc<DatabaseConnection>,
    registrations: RegistrationRepository,
    side_effects: SideEffectsHandle,
}

impl RegistrationWorkflow {
    /// Create a new registration workflow service with no queue.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let registrations = RegistrationRepository::new(db.clone());
        Self {
            db,
            registrations,
            side_effects: Arc::new(NoOpSideEffects),
        }
    }

    /// Attach the side-effect queue used for notification dispatch.
    #[must_use]
    pub fn with_side_effects(mut self, side_effects: SideEffectsHandle) -> Self {
        self.side_effects = side_effects;
        self
    }

    /// Submit a new registration in `Pending` status.
    pub async fn submit(
        &self,
        student_id: &str,
        course_id: &str,
        batch_preference: Option<&str>,
        documents: serde_json::Value,
    ) -> AppResult<registration::Model> {
        let course = Course::find_by_id(course_id)
            .filter(course::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("course {course_id} not found")))?;

        if !course.is_active {
            return Err(AppError::BadRequest(format!(
                "course {course_id} is not accepting registrations"
            )));
        }

        let model = registration::ActiveModel {
            id: Set(crate::generate_id()),
            student_id: Set(student_id.to_string()),
            course_id: Set(course_id.to_string()),
            batch_preference: Set(batch_preference.map(String::from)),
            documents: Set(documents),
            status: Set(RegistrationStatus::Pending),
            academic_reviewed_by: Set(None),
            academic_reviewed_at: Set(None),
            financial_verified_by: Set(None),
            financial_verified_at: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            admin_notes: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(registration_id = %created.id, student_id = %student_id, "Registration submitted");

        Ok(created)
    }

    /// Perform the academic review step.
    ///
    /// Requires status `Pending`; legal decisions are `AcademicReviewed` or
    /// `Rejected`.
    pub async fn academic_review(
        &self,
        id: &str,
        actor_id: &str,
        decision: RegistrationStatus,
        notes: Option<&str>,
    ) -> AppResult<registration::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reg = Self::load_locked(&txn, id).await?;
        Self::validate_transition(
            &reg,
            RegistrationStatus::Pending,
            RegistrationStatus::AcademicReviewed,
            decision,
            "academic review",
        )?;

        let now = chrono::Utc::now();
        let old_status = reg.status;
        let mut model: registration::ActiveModel = reg.into();
        model.status = Set(decision);
        model.academic_reviewed_by = Set(Some(actor_id.to_string()));
        model.academic_reviewed_at = Set(Some(now.into()));
        if let Some(n) = notes {
            model.admin_notes = Set(Some(n.to_string()));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::record_step(&txn, actor_id, "registration.academic_review", &updated, old_status)
            .await?;

        let note = if decision == RegistrationStatus::Rejected {
            Some(Self::notify_rejected(&txn, &updated).await?)
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(n) = &note {
            self.enqueue_notification(&n.id).await;
        }

        Ok(updated)
    }

    /// Perform the financial verification step.
    ///
    /// Requires status `AcademicReviewed`; legal decisions are
    /// `FinancialVerified` or `Rejected`.
    pub async fn financial_verify(
        &self,
        id: &str,
        actor_id: &str,
        decision: RegistrationStatus,
        notes: Option<&str>,
    ) -> AppResult<registration::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reg = Self::load_locked(&txn, id).await?;
        Self::validate_transition(
            &reg,
            RegistrationStatus::AcademicReviewed,
            RegistrationStatus::FinancialVerified,
            decision,
            "financial verification",
        )?;

        let now = chrono::Utc::now();
        let old_status = reg.status;
        let mut model: registration::ActiveModel = reg.into();
        model.status = Set(decision);
        model.financial_verified_by = Set(Some(actor_id.to_string()));
        model.financial_verified_at = Set(Some(now.into()));
        if let Some(n) = notes {
            model.admin_notes = Set(Some(n.to_string()));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::record_step(&txn, actor_id, "registration.financial_verify", &updated, old_status)
            .await?;

        let note = if decision == RegistrationStatus::Rejected {
            Some(Self::notify_rejected(&txn, &updated).await?)
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(n) = &note {
            self.enqueue_notification(&n.id).await;
        }

        Ok(updated)
    }

    /// Perform the final approval step.
    ///
    /// Requires status `FinancialVerified`; legal decisions are `Approved` or
    /// `Rejected`. Approval additionally resolves a batch and creates an
    /// active enrollment in the same transaction; if no batch has room the
    /// whole transaction aborts with `NoBatchAvailable` and the registration
    /// is left untouched.
    pub async fn final_approve(
        &self,
        id: &str,
        actor_id: &str,
        decision: RegistrationStatus,
        notes: Option<&str>,
    ) -> AppResult<RegistrationOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reg = Self::load_locked(&txn, id).await?;
        Self::validate_transition(
            &reg,
            RegistrationStatus::FinancialVerified,
            RegistrationStatus::Approved,
            decision,
            "final approval",
        )?;

        let now = chrono::Utc::now();
        let old_status = reg.status;

        let created_enrollment = if decision == RegistrationStatus::Approved {
            let target = Self::resolve_batch(&txn, &reg).await?;
            Some(Self::create_enrollment(&txn, &reg, &target, now).await?)
        } else {
            None
        };

        let mut model: registration::ActiveModel = reg.into();
        model.status = Set(decision);
        model.approved_by = Set(Some(actor_id.to_string()));
        model.approved_at = Set(Some(now.into()));
        if let Some(n) = notes {
            model.admin_notes = Set(Some(n.to_string()));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        AuditRecorder::record(
            &txn,
            actor_id,
            "registration.final_approve",
            "registration",
            &updated.id,
            Some(json!({ "status": old_status })),
            Some(json!({
                "status": updated.status,
                "enrollment_id": created_enrollment.as_ref().map(|e| e.id.clone()),
            })),
        )
        .await?;

        let note = if decision == RegistrationStatus::Approved {
            NotificationService::create_in(
                &txn,
                &updated.student_id,
                NotificationKind::RegistrationApproved,
                "Registration approved",
                "Your registration has been approved and you have been enrolled.",
            )
            .await?
        } else {
            Self::notify_rejected(&txn, &updated).await?
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.enqueue_notification(&note.id).await;

        info!(
            registration_id = %updated.id,
            status = ?updated.status,
            enrollment_id = ?created_enrollment.as_ref().map(|e| e.id.clone()),
            "Registration finalized"
        );

        Ok(RegistrationOutcome {
            registration: updated,
            enrollment: created_enrollment,
        })
    }

    /// Get a registration by ID.
    pub async fn get(&self, id: &str) -> AppResult<registration::Model> {
        self.registrations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("registration {id} not found")))
    }

    /// List registrations with optional status filter.
    pub async fn list(
        &self,
        status: Option<RegistrationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        self.registrations.list(status, limit, offset).await
    }

    /// Count registrations awaiting their first review.
    pub async fn count_pending(&self) -> AppResult<u64> {
        self.registrations.count_pending().await
    }

    async fn load_locked(
        txn: &DatabaseTransaction,
        id: &str,
    ) -> AppResult<registration::Model> {
        Registration::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("registration {id} not found")))
    }

    fn validate_transition(
        reg: &registration::Model,
        predecessor: RegistrationStatus,
        forward: RegistrationStatus,
        decision: RegistrationStatus,
        step: &str,
    ) -> AppResult<()> {
        if reg.status != predecessor {
            return Err(AppError::InvalidSequence(format!(
                "{step} requires status {predecessor:?}, registration {} is {:?}",
                reg.id, reg.status
            )));
        }
        if decision != forward && decision != RegistrationStatus::Rejected {
            return Err(AppError::InvalidStatus(format!(
                "{decision:?} is not a legal decision for {step}"
            )));
        }
        Ok(())
    }

    /// Resolve the batch to enroll into: the preference if it belongs to the
    /// course, is still enrollable and has room; else the earliest-starting
    /// upcoming batch with room.
    async fn resolve_batch(
        txn: &DatabaseTransaction,
        reg: &registration::Model,
    ) -> AppResult<batch::Model> {
        if let Some(pref_id) = &reg.batch_preference {
            let preferred = Batch::find_by_id(pref_id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            // A preference recorded at submission time can be stale by the
            // final approval: completed and cancelled batches fall through
            // to the candidate scan.
            if let Some(b) = preferred {
                if b.course_id == reg.course_id
                    && b.deleted_at.is_none()
                    && matches!(b.status, BatchStatus::Upcoming | BatchStatus::Ongoing)
                    && EnrollmentCapacityChecker::has_room(txn, &b).await?
                {
                    return Ok(b);
                }
            }
        }

        let candidates = Batch::find()
            .filter(batch::Column::CourseId.eq(reg.course_id.as_str()))
            .filter(batch::Column::Status.eq(BatchStatus::Upcoming))
            .filter(batch::Column::DeletedAt.is_null())
            .order_by_asc(batch::Column::StartDate)
            .lock_exclusive()
            .all(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for b in candidates {
            if reg.batch_preference.as_deref() == Some(b.id.as_str()) {
                continue;
            }
            if EnrollmentCapacityChecker::has_room(txn, &b).await? {
                return Ok(b);
            }
        }

        Err(AppError::NoBatchAvailable(format!(
            "no upcoming batch with room for course {}",
            reg.course_id
        )))
    }

    /// Insert the enrollment for an approved registration. Financial
    /// verification is the payment gate on this path, so the enrollment is
    /// created with `payment_status = Approved`.
    async fn create_enrollment(
        txn: &DatabaseTransaction,
        reg: &registration::Model,
        target: &batch::Model,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<enrollment::Model> {
        let existing = Enrollment::find()
            .filter(enrollment::Column::StudentId.eq(reg.student_id.as_str()))
            .filter(enrollment::Column::BatchId.eq(target.id.as_str()))
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "student {} is already enrolled in batch {}",
                reg.student_id, target.id
            )));
        }

        let model = enrollment::ActiveModel {
            id: Set(crate::generate_id()),
            student_id: Set(reg.student_id.clone()),
            batch_id: Set(target.id.clone()),
            status: Set(EnrollmentStatus::Active),
            payment_status: Set(PaymentStatus::Approved),
            enrolled_at: Set(Some(now.into())),
            created_at: Set(now.into()),
        };

        model
            .insert(txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                    format!(
                        "student {} is already enrolled in batch {}",
                        reg.student_id, target.id
                    ),
                ),
                _ => AppError::Database(e.to_string()),
            })
    }

    async fn record_step(
        txn: &DatabaseTransaction,
        actor_id: &str,
        action: &str,
        updated: &registration::Model,
        old_status: RegistrationStatus,
    ) -> AppResult<()> {
        AuditRecorder::record(
            txn,
            actor_id,
            action,
            "registration",
            &updated.id,
            Some(json!({ "status": old_status })),
            Some(json!({ "status": updated.status })),
        )
        .await?;
        Ok(())
    }

    async fn notify_rejected(
        txn: &DatabaseTransaction,
        reg: &registration::Model,
    ) -> AppResult<notification::Model> {
        NotificationService::create_in(
            txn,
            &reg.student_id,
            NotificationKind::RegistrationRejected,
            "Registration rejected",
            "Your registration has been rejected. Contact the office for details.",
        )
        .await
    }

    /// Hand a committed notification row to the dispatch queue. Best-effort;
    /// the unsent-notification sweep picks up anything dropped here.
    async fn enqueue_notification(&self, notification_id: &str) {
        if let Err(e) = self.side_effects.queue_notification(notification_id).await {
            error!(notification_id = %notification_id, error = %e, "Failed to queue notification dispatch");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campus_db::entities::{audit_log, notification};
    use chrono::{NaiveDate, Utc};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_registration(id: &str, status: RegistrationStatus) -> registration::Model {
        registration::Model {
            id: id.to_string(),
            student_id: "student-1".to_string(),
            course_id: "course-1".to_string(),
            batch_preference: None,
            documents: json!({"transcript": "doc-1"}),
            status,
            academic_reviewed_by: None,
            academic_reviewed_at: None,
            financial_verified_by: None,
            financial_verified_at: None,
            approved_by: None,
            approved_at: None,
            admin_notes: None,
            created_at: Utc::now().into(),
        }
    }

    fn test_batch(id: &str, capacity: i32) -> batch::Model {
        batch::Model {
            id: id.to_string(),
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

    fn test_enrollment(id: &str, batch_id: &str) -> enrollment::Model {
        enrollment::Model {
            id: id.to_string(),
            student_id: "student-1".to_string(),
            batch_id: batch_id.to_string(),
            status: EnrollmentStatus::Active,
            payment_status: PaymentStatus::Approved,
            enrolled_at: Some(Utc::now().into()),
            created_at: Utc::now().into(),
        }
    }

    fn audit_row() -> audit_log::Model {
        audit_log::Model {
            id: "audit-1".to_string(),
            user_id: "admin-1".to_string(),
            action: "registration.final_approve".to_string(),
            entity: "registration".to_string(),
            entity_id: "reg-1".to_string(),
            old_value: None,
            new_value: None,
            created_at: Utc::now().into(),
        }
    }

    fn notification_row(kind: NotificationKind) -> notification::Model {
        notification::Model {
            id: "notif-1".to_string(),
            user_id: "student-1".to_string(),
            kind,
            title: String::new(),
            body: String::new(),
            is_read: false,
            sent_at: None,
            created_at: Utc::now().into(),
        }
    }

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    #[tokio::test]
    async fn test_academic_review_out_of_sequence() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_registration(
                    "reg-1",
                    RegistrationStatus::AcademicReviewed,
                )]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let result = workflow
            .academic_review("reg-1", "admin-1", RegistrationStatus::AcademicReviewed, None)
            .await;

        assert!(matches!(result, Err(AppError::InvalidSequence(_))));
    }

    #[tokio::test]
    async fn test_academic_review_illegal_decision() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_registration("reg-1", RegistrationStatus::Pending)]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let result = workflow
            .academic_review("reg-1", "admin-1", RegistrationStatus::Approved, None)
            .await;

        assert!(matches!(result, Err(AppError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_academic_review_advances_status() {
        let mut reviewed = test_registration("reg-1", RegistrationStatus::AcademicReviewed);
        reviewed.academic_reviewed_by = Some("admin-1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_registration(
                    "reg-1",
                    RegistrationStatus::Pending,
                )]])
                .append_query_results([vec![reviewed]])
                .append_query_results([vec![audit_row()]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let result = workflow
            .academic_review("reg-1", "admin-1", RegistrationStatus::AcademicReviewed, None)
            .await
            .unwrap();

        assert_eq!(result.status, RegistrationStatus::AcademicReviewed);
        assert_eq!(result.academic_reviewed_by.as_deref(), Some("admin-1"));
    }

    #[tokio::test]
    async fn test_financial_verify_requires_academic_review() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_registration("reg-1", RegistrationStatus::Pending)]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let result = workflow
            .financial_verify("reg-1", "admin-1", RegistrationStatus::FinancialVerified, None)
            .await;

        assert!(matches!(result, Err(AppError::InvalidSequence(_))));
    }

    #[tokio::test]
    async fn test_final_approve_creates_enrollment() {
        let mut approved = test_registration("reg-1", RegistrationStatus::Approved);
        approved.approved_by = Some("admin-1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lock the registration
                .append_query_results([vec![test_registration(
                    "reg-1",
                    RegistrationStatus::FinancialVerified,
                )]])
                // upcoming batch candidates
                .append_query_results([vec![test_batch("batch-1", 1)]])
                // occupancy count for the candidate
                .append_query_results([count_result(0)])
                // duplicate enrollment check
                .append_query_results([Vec::<enrollment::Model>::new()])
                // enrollment insert
                .append_query_results([vec![test_enrollment("enr-1", "batch-1")]])
                // registration update
                .append_query_results([vec![approved]])
                // audit entry
                .append_query_results([vec![audit_row()]])
                // notification row
                .append_query_results([vec![notification_row(
                    NotificationKind::RegistrationApproved,
                )]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let outcome = workflow
            .final_approve("reg-1", "admin-1", RegistrationStatus::Approved, None)
            .await
            .unwrap();

        assert_eq!(outcome.registration.status, RegistrationStatus::Approved);
        let enrollment = outcome.enrollment.unwrap();
        assert_eq!(enrollment.batch_id, "batch-1");
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.payment_status, PaymentStatus::Approved);
    }

    #[tokio::test]
    async fn test_final_approve_no_batch_available() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_registration(
                    "reg-1",
                    RegistrationStatus::FinancialVerified,
                )]])
                // one candidate, already full
                .append_query_results([vec![test_batch("batch-1", 1)]])
                .append_query_results([count_result(1)])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let result = workflow
            .final_approve("reg-1", "admin-1", RegistrationStatus::Approved, None)
            .await;

        assert!(matches!(result, Err(AppError::NoBatchAvailable(_))));
    }

    #[tokio::test]
    async fn test_final_reject_creates_no_enrollment() {
        let mut rejected = test_registration("reg-1", RegistrationStatus::Rejected);
        rejected.approved_by = Some("admin-1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_registration(
                    "reg-1",
                    RegistrationStatus::FinancialVerified,
                )]])
                .append_query_results([vec![rejected]])
                .append_query_results([vec![audit_row()]])
                .append_query_results([vec![notification_row(
                    NotificationKind::RegistrationRejected,
                )]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let outcome = workflow
            .final_approve("reg-1", "admin-1", RegistrationStatus::Rejected, None)
            .await
            .unwrap();

        assert_eq!(outcome.registration.status, RegistrationStatus::Rejected);
        assert!(outcome.enrollment.is_none());
    }

    #[tokio::test]
    async fn test_final_approve_skips_completed_preference() {
        let mut reg = test_registration("reg-1", RegistrationStatus::FinancialVerified);
        reg.batch_preference = Some("batch-old".to_string());

        let mut stale = test_batch("batch-old", 30);
        stale.status = BatchStatus::Completed;

        let mut approved = test_registration("reg-1", RegistrationStatus::Approved);
        approved.batch_preference = Some("batch-old".to_string());
        approved.approved_by = Some("admin-1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lock the registration
                .append_query_results([vec![reg]])
                // preferred batch, completed since submission
                .append_query_results([vec![stale]])
                // upcoming batch candidates
                .append_query_results([vec![test_batch("batch-1", 30)]])
                // occupancy count for the candidate
                .append_query_results([count_result(0)])
                // duplicate enrollment check
                .append_query_results([Vec::<enrollment::Model>::new()])
                // enrollment insert
                .append_query_results([vec![test_enrollment("enr-1", "batch-1")]])
                // registration update
                .append_query_results([vec![approved]])
                // audit entry
                .append_query_results([vec![audit_row()]])
                // notification row
                .append_query_results([vec![notification_row(
                    NotificationKind::RegistrationApproved,
                )]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let outcome = workflow
            .final_approve("reg-1", "admin-1", RegistrationStatus::Approved, None)
            .await
            .unwrap();

        let enrollment = outcome.enrollment.unwrap();
        assert_eq!(enrollment.batch_id, "batch-1");
    }

    #[derive(Default)]
    struct RecordingSideEffects {
        notifications: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl crate::SideEffects for RecordingSideEffects {
        async fn queue_invoice(&self, _payment_id: &str) -> AppResult<()> {
            Ok(())
        }

        async fn queue_notification(&self, notification_id: &str) -> AppResult<()> {
            self.notifications
                .lock()
                .unwrap()
                .push(notification_id.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_final_reject_queues_notification_dispatch() {
        let effects = Arc::new(RecordingSideEffects::default());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_registration(
                    "reg-1",
                    RegistrationStatus::FinancialVerified,
                )]])
                .append_query_results([vec![test_registration(
                    "reg-1",
                    RegistrationStatus::Rejected,
                )]])
                .append_query_results([vec![audit_row()]])
                .append_query_results([vec![notification_row(
                    NotificationKind::RegistrationRejected,
                )]])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db).with_side_effects(effects.clone());
        workflow
            .final_approve("reg-1", "admin-1", RegistrationStatus::Rejected, None)
            .await
            .unwrap();

        assert_eq!(
            *effects.notifications.lock().unwrap(),
            vec!["notif-1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_registration_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<registration::Model>::new()])
                .into_connection(),
        );

        let workflow = RegistrationWorkflow::new(db);
        let result = workflow
            .academic_review("missing", "admin-1", RegistrationStatus::AcademicReviewed, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
