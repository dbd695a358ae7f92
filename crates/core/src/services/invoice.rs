//! Invoice generation.
//!
//! Runs strictly post-commit, typically from a queue worker: the payment is
//! already durably approved before any invoice work starts, and a rendering
//! or storage failure never touches the approval.
//!
//! Invoice numbers are human-readable and scoped to the day:
//! `INV-YYYYMMDD-XXXX`, where the sequence is today's invoice count plus
//! one. The unique index on the number plus one bounded retry covers
//! concurrent generators landing on the same sequence.

use async_trait::async_trait;
use campus_common::{AppError, AppResult};
use campus_db::entities::{Payment, payment, payment::PaymentStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Trait for rendering an invoice artifact.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    /// Render the invoice document for a payment.
    async fn render(&self, payment: &payment::Model, invoice_number: &str) -> AppResult<Vec<u8>>;
}

/// Trait for persisting a rendered invoice.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Persist the document and return a storage reference.
    async fn put(&self, invoice_number: &str, document: Vec<u8>) -> AppResult<String>;
}

/// Renderer that produces an empty document, for tests and wiring without a
/// PDF backend.
#[derive(Clone, Default)]
pub struct NoOpRenderer;

#[async_trait]
impl InvoiceRenderer for NoOpRenderer {
    async fn render(&self, _payment: &payment::Model, _invoice_number: &str) -> AppResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Store that discards the document and returns a synthetic reference.
#[derive(Clone, Default)]
pub struct NoOpStore;

#[async_trait]
impl InvoiceStore for NoOpStore {
    async fn put(&self, invoice_number: &str, _document: Vec<u8>) -> AppResult<String> {
        Ok(format!("noop://{invoice_number}"))
    }
}

/// Invoice generation service.
#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
    renderer: Arc<dyn InvoiceRenderer>,
    store: Arc<dyn InvoiceStore>,
    prefix: String,
}

impl InvoiceService {
    /// Create a new invoice service with the default `INV` prefix.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        renderer: Arc<dyn InvoiceRenderer>,
        store: Arc<dyn InvoiceStore>,
    ) -> Self {
        Self {
            db,
            renderer,
            store,
            prefix: "INV".to_string(),
        }
    }

    /// Override the invoice number prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Generate the invoice for an approved payment.
    ///
    /// Idempotent: a payment that already carries an invoice number is
    /// returned unchanged, so retries never produce a second invoice.
    pub async fn generate(&self, payment_id: &str) -> AppResult<payment::Model> {
        let pay = Payment::find_by_id(payment_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("payment {payment_id} not found")))?;

        if pay.status != PaymentStatus::Approved {
            return Err(AppError::InvalidStatus(format!(
                "payment {payment_id} is {:?}, invoices are generated for approved payments only",
                pay.status
            )));
        }

        if pay.invoice_number.is_some() {
            return Ok(pay);
        }

        // One retry for a concurrent generator taking the same sequence.
        match self.assign_number(&pay).await {
            Err(AppError::Conflict(_)) => {
                warn!(payment_id = %payment_id, "Invoice number collision, retrying");
                self.assign_number(&pay).await
            }
            other => other,
        }
    }

    async fn assign_number(&self, pay: &payment::Model) -> AppResult<payment::Model> {
        let now = chrono::Utc::now();
        let day = now.format("%Y%m%d");
        let day_prefix = format!("{}-{}-", self.prefix, day);

        let issued_today = Payment::find()
            .filter(payment::Column::InvoiceNumber.like(format!("{day_prefix}%")))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let number = format!("{}{:04}", day_prefix, issued_today + 1);

        let document = self.renderer.render(pay, &number).await?;
        let reference = self.store.put(&number, document).await?;

        let mut model: payment::ActiveModel = pay.clone().into();
        model.invoice_number = Set(Some(number.clone()));
        model.invoice_ref = Set(Some(reference));
        model.invoice_generated_at = Set(Some(now.into()));

        let updated = model
            .update(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict(format!("invoice number {number} already taken"))
                }
                _ => AppError::Database(e.to_string()),
            })?;

        info!(payment_id = %updated.id, invoice_number = %number, "Invoice generated");

        Ok(updated)
    }
}
