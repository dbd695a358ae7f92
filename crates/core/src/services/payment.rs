//! Payment approval workflow.
//!
//! A payment transitions `Pending -> {Approved, Rejected}` exactly once.
//! The transactional core locks the payment row, checks it is still pending,
//! flips payment and enrollment state, and writes the audit entry and
//! notification row in the same transaction. Idempotency-key deduplication,
//! cache invalidation and invoice queueing happen outside the transaction.

use async_trait::async_trait;
use campus_common::{AppError, AppResult, EntityCache, IdempotencyCache};
use campus_db::entities::{
    Enrollment, Payment, enrollment, notification::NotificationKind, payment,
    payment::PaymentStatus,
};
use campus_db::repositories::PaymentRepository;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::audit::AuditRecorder;
use super::notification::NotificationService;
use super::side_effects::{NoOpSideEffects, SideEffectsHandle};

/// Result of settling a payment: the updated payment and its enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// The payment after the transition.
    pub payment: payment::Model,
    /// The linked enrollment after its `payment_status` update.
    pub enrollment: enrollment::Model,
}

/// The terminal decision applied to a pending payment.
enum Decision {
    Approve,
    Reject { reason: String },
}

/// Key-value store used for idempotency-key deduplication.
///
/// The workflow treats any store failure as a miss; the status check inside
/// the transaction remains the correctness gate.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Look up a previously stored result.
    async fn check(&self, key: &str) -> AppResult<Option<serde_json::Value>>;

    /// Store a result under an idempotency key.
    async fn store(&self, key: &str, value: &serde_json::Value) -> AppResult<()>;
}

#[async_trait]
impl IdempotencyStore for IdempotencyCache {
    async fn check(&self, key: &str) -> AppResult<Option<serde_json::Value>> {
        IdempotencyCache::check(self, key)
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }

    async fn store(&self, key: &str, value: &serde_json::Value) -> AppResult<()> {
        IdempotencyCache::store(self, key, value)
            .await
            .map_err(|e| AppError::Redis(e.to_string()))
    }
}

/// Payment approval workflow service.
#[derive(Clone)]
pub struct PaymentWorkflow {
    db: Arc<DatabaseConnection>,
    payments: PaymentRepository,
    idempotency: Option<Arc<dyn IdempotencyStore>>,
    entity_cache: Option<Arc<EntityCache>>,
    side_effects: SideEffectsHandle,
}

impl PaymentWorkflow {
    /// Create a new payment workflow service with no caches and no queue.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let payments = PaymentRepository::new(db.clone());
        Self {
            db,
            payments,
            idempotency: None,
            entity_cache: None,
            side_effects: Arc::new(NoOpSideEffects),
        }
    }

    /// Attach an idempotency store for request deduplication.
    #[must_use]
    pub fn with_idempotency(mut self, store: Arc<dyn IdempotencyStore>) -> Self {
        self.idempotency = Some(store);
        self
    }

    /// Attach an entity cache for post-commit invalidation.
    #[must_use]
    pub fn with_entity_cache(mut self, cache: Arc<EntityCache>) -> Self {
        self.entity_cache = Some(cache);
        self
    }

    /// Attach the side-effect queue used for invoice generation.
    #[must_use]
    pub fn with_side_effects(mut self, side_effects: SideEffectsHandle) -> Self {
        self.side_effects = side_effects;
        self
    }

    /// Submit a new payment in `Pending` status.
    ///
    /// `transaction_id` is globally unique; a duplicate submission fails
    /// with `DuplicateTransaction`.
    pub async fn submit(
        &self,
        enrollment_id: &str,
        student_id: &str,
        amount: i64,
        transaction_id: &str,
        screenshot_ref: &str,
    ) -> AppResult<payment::Model> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }

        Enrollment::find_by_id(enrollment_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("enrollment {enrollment_id} not found")))?;

        if self
            .payments
            .find_by_transaction_id(transaction_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateTransaction(transaction_id.to_string()));
        }

        let model = payment::ActiveModel {
            id: Set(crate::generate_id()),
            enrollment_id: Set(enrollment_id.to_string()),
            student_id: Set(student_id.to_string()),
            amount: Set(amount),
            transaction_id: Set(transaction_id.to_string()),
            screenshot_ref: Set(screenshot_ref.to_string()),
            status: Set(PaymentStatus::Pending),
            approved_by: Set(None),
            approved_at: Set(None),
            rejected_reason: Set(None),
            invoice_number: Set(None),
            invoice_ref: Set(None),
            invoice_generated_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        // The unique index backstops the pre-check under concurrent submits.
        let created = model.insert(self.db.as_ref()).await.map_err(|e| {
            match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::DuplicateTransaction(transaction_id.to_string())
                }
                _ => AppError::Database(e.to_string()),
            }
        })?;

        info!(payment_id = %created.id, transaction_id = %transaction_id, "Payment submitted");

        Ok(created)
    }

    /// Approve a pending payment.
    pub async fn approve(
        &self,
        payment_id: &str,
        actor_id: &str,
        idempotency_key: Option<&str>,
    ) -> AppResult<PaymentOutcome> {
        if let Some(cached) = self.check_idempotency(idempotency_key).await {
            return Ok(cached);
        }

        let (outcome, notification_id) =
            self.settle(payment_id, actor_id, Decision::Approve).await?;

        self.after_commit(&outcome, &notification_id, idempotency_key, true)
            .await;

        Ok(outcome)
    }

    /// Reject a pending payment with a reason.
    pub async fn reject(
        &self,
        payment_id: &str,
        actor_id: &str,
        reason: &str,
        idempotency_key: Option<&str>,
    ) -> AppResult<PaymentOutcome> {
        if let Some(cached) = self.check_idempotency(idempotency_key).await {
            return Ok(cached);
        }

        let (outcome, notification_id) = self
            .settle(
                payment_id,
                actor_id,
                Decision::Reject {
                    reason: reason.to_string(),
                },
            )
            .await?;

        self.after_commit(&outcome, &notification_id, idempotency_key, false)
            .await;

        Ok(outcome)
    }

    /// Get a payment by ID.
    pub async fn get(&self, id: &str) -> AppResult<payment::Model> {
        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("payment {id} not found")))
    }

    /// List payments awaiting review.
    pub async fn list_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<payment::Model>> {
        self.payments.list_pending(limit, offset).await
    }

    /// The transactional core shared by approve and reject. Returns the
    /// outcome plus the id of the notification row written alongside it.
    async fn settle(
        &self,
        payment_id: &str,
        actor_id: &str,
        decision: Decision,
    ) -> AppResult<(PaymentOutcome, String)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let pay = Payment::find_by_id(payment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("payment {payment_id} not found")))?;

        if pay.status.is_terminal() {
            return Err(AppError::AlreadyProcessed(format!(
                "payment {payment_id} is already {:?}",
                pay.status
            )));
        }

        let enr = Enrollment::find_by_id(&pay.enrollment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| {
                AppError::NotFound(format!("enrollment {} not found", pay.enrollment_id))
            })?;

        let now = chrono::Utc::now();
        let old_status = pay.status;
        let (new_status, action, kind, title, body) = match &decision {
            Decision::Approve => (
                PaymentStatus::Approved,
                "payment.approve",
                NotificationKind::PaymentApproved,
                "Payment approved",
                "Your payment has been verified and approved.".to_string(),
            ),
            Decision::Reject { reason } => (
                PaymentStatus::Rejected,
                "payment.reject",
                NotificationKind::PaymentRejected,
                "Payment rejected",
                format!("Your payment was rejected: {reason}"),
            ),
        };

        let mut pay_model: payment::ActiveModel = pay.into();
        pay_model.status = Set(new_status);
        pay_model.approved_by = Set(Some(actor_id.to_string()));
        pay_model.approved_at = Set(Some(now.into()));
        if let Decision::Reject { reason } = &decision {
            pay_model.rejected_reason = Set(Some(reason.clone()));
        }

        let updated_payment = pay_model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut enr_model: enrollment::ActiveModel = enr.into();
        enr_model.payment_status = Set(new_status);
        if matches!(decision, Decision::Approve) {
            enr_model.status = Set(enrollment::EnrollmentStatus::Active);
            enr_model.enrolled_at = Set(Some(now.into()));
        }

        let updated_enrollment = enr_model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        AuditRecorder::record(
            &txn,
            actor_id,
            action,
            "payment",
            &updated_payment.id,
            Some(json!({ "status": old_status })),
            Some(json!({ "status": updated_payment.status })),
        )
        .await?;

        let note =
            NotificationService::create_in(&txn, &updated_payment.student_id, kind, title, &body)
                .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            payment_id = %updated_payment.id,
            status = ?updated_payment.status,
            actor_id = %actor_id,
            "Payment settled"
        );

        Ok((
            PaymentOutcome {
                payment: updated_payment,
                enrollment: updated_enrollment,
            },
            note.id,
        ))
    }

    /// Look up a cached outcome for the idempotency key. Cache failures are
    /// treated as misses: the status check inside the transaction is the
    /// correctness gate.
    async fn check_idempotency(&self, key: Option<&str>) -> Option<PaymentOutcome> {
        let cache = self.idempotency.as_ref()?;
        let key = key?;

        match cache.check(key).await {
            Ok(Some(value)) => match serde_json::from_value::<PaymentOutcome>(value) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding undecodable idempotency entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Idempotency cache unavailable, proceeding");
                None
            }
        }
    }

    /// Post-commit work: cache invalidation, idempotency store, invoice and
    /// notification queueing. All best-effort; the transaction is already
    /// durable.
    async fn after_commit(
        &self,
        outcome: &PaymentOutcome,
        notification_id: &str,
        idempotency_key: Option<&str>,
        approved: bool,
    ) {
        if let Some(cache) = &self.entity_cache {
            if let Err(e) = cache.invalidate("payment", &outcome.payment.id).await {
                warn!(payment_id = %outcome.payment.id, error = %e, "Payment cache invalidation failed");
            }
            if let Err(e) = cache.invalidate("enrollment", &outcome.enrollment.id).await {
                warn!(enrollment_id = %outcome.enrollment.id, error = %e, "Enrollment cache invalidation failed");
            }
        }

        if let (Some(cache), Some(key)) = (&self.idempotency, idempotency_key) {
            match serde_json::to_value(outcome) {
                Ok(value) => {
                    if let Err(e) = cache.store(key, &value).await {
                        warn!(key = %key, error = %e, "Failed to store idempotency result");
                    }
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to serialize idempotency result");
                }
            }
        }

        if approved {
            if let Err(e) = self.side_effects.queue_invoice(&outcome.payment.id).await {
                error!(payment_id = %outcome.payment.id, error = %e, "Failed to queue invoice generation");
            }
        }

        if let Err(e) = self.side_effects.queue_notification(notification_id).await {
            error!(notification_id = %notification_id, error = %e, "Failed to queue notification dispatch");
        }
    }
}
