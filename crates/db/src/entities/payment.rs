//! Payment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement state of a payment, also used as the `payment_status` of the
/// enrollment it settles.
///
/// A payment transitions `Pending -> {Approved, Rejected}` exactly once;
/// both are terminal. `Partial` marks installment payments recorded outside
/// the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "partial")]
    Partial,
}

impl PaymentStatus {
    /// Whether no further transition is permitted from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A payment submitted by a student against an enrollment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub enrollment_id: String,

    pub student_id: String,

    /// Amount in minor currency units.
    pub amount: i64,

    /// External bank/UPI transaction reference, globally unique.
    #[sea_orm(unique)]
    pub transaction_id: String,

    /// Storage reference for the uploaded payment screenshot.
    pub screenshot_ref: String,

    pub status: PaymentStatus,

    #[sea_orm(nullable)]
    pub approved_by: Option<String>,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "Text", nullable)]
    pub rejected_reason: Option<String>,

    /// Human-readable invoice number, set post-commit by invoice generation.
    #[sea_orm(unique, nullable)]
    pub invoice_number: Option<String>,

    /// Storage reference for the generated invoice artifact.
    #[sea_orm(nullable)]
    pub invoice_ref: Option<String>,

    #[sea_orm(nullable)]
    pub invoice_generated_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
